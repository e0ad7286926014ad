//! JSON score input and output

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use notation::{Key, Part, ScoreDocument};
use serde::Serialize;

/// How transformed scores are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain score document, same shape as the input
    Score,
    /// Every element with its key, harmony and position
    Analyzed,
}

/// Read a score document from `path`, or from stdin when `path` is `-`
pub fn read_score(path: &Path) -> Result<ScoreDocument> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read score from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read score {}", path.display()))?
    };

    parse_score(&contents).with_context(|| format!("Invalid score {}", path.display()))
}

pub fn parse_score(json: &str) -> Result<ScoreDocument> {
    serde_json::from_str(json).context("Failed to parse score JSON")
}

/// Write transformed parts; `key` and `time_signature` label a result with no elements
pub fn write_parts(
    out: &mut dyn Write,
    parts: &[Part],
    format: OutputFormat,
    key: Key,
    time_signature: u8,
) -> Result<()> {
    match format {
        OutputFormat::Analyzed => write_json(out, parts),
        OutputFormat::Score => {
            let document = ScoreDocument::from_parts(parts).unwrap_or_else(|| ScoreDocument {
                key,
                time_signature,
                parts: parts
                    .iter()
                    .map(|part| part.iter().map(|_| Vec::new()).collect())
                    .collect(),
            });
            write_json(out, &document)
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}
