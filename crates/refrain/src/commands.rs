//! CLI command implementations

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use modulation::{EdgeSnapshot, ModulationGraph};
use notation::{stats as duration_stats, Key, Measure, Part, QuarterLength, ScoreDocument, Triad};
use rand::rngs::StdRng;
use rand::SeedableRng;
use refrainconf::{ConfigSources, RefrainConfig};
use serde::Serialize;
use tracing::info;
use transform::{fill_ostinato, transpose_parts, MemoryCache, Rhythm, RhythmChoice, TransformSession};

use crate::io::{write_json, write_parts, OutputFormat};

/// `original` keeps the score's rhythm; anything else must parse as a [`Rhythm`]
pub fn parse_rhythm_choice(s: &str) -> Result<RhythmChoice> {
    if s.trim().eq_ignore_ascii_case("original") {
        return Ok(RhythmChoice::Original);
    }
    let rhythm: Rhythm = s.parse()?;
    Ok(RhythmChoice::Ostinato(rhythm))
}

/// Move every part to `key`, keeping scale degrees
pub fn transpose(
    score: &ScoreDocument,
    key: &Key,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let parts = score.analyze().context("Failed to analyse score")?;
    let transposed = transpose_parts(&parts, key)
        .with_context(|| format!("Failed to transpose from {} to {}", score.key, key))?;
    info!(from = %score.key, to = %key, parts = transposed.len(), "transposed score");

    write_parts(out, &transposed, format, *key, score.time_signature)
}

/// Re-rhythm every part to `rhythm`
pub fn ostinato(
    score: &ScoreDocument,
    rhythm: &Rhythm,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let parts = score.analyze().context("Failed to analyse score")?;
    let filled = parts
        .iter()
        .map(|part| fill_ostinato(part, rhythm))
        .collect::<Result<Vec<Part>, _>>()
        .with_context(|| format!("Failed to apply rhythm {}", rhythm))?;
    info!(rhythm = %rhythm, parts = filled.len(), "applied ostinato");

    write_parts(out, &filled, format, score.key, score.time_signature)
}

/// Options for [`transform`]
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub key: Option<Key>,
    pub rhythm: Option<RhythmChoice>,
    pub cache_capacity: usize,
    /// Only emit this measure (1-based) of each part
    pub measure: Option<usize>,
}

/// Key and rhythm change together, through a cached session
pub fn transform(
    score: &ScoreDocument,
    options: &TransformOptions,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let parts = score.analyze().context("Failed to analyse score")?;
    let cache = Arc::new(MemoryCache::new(options.cache_capacity));
    let mut session = TransformSession::with_cache(parts, score.key, cache)?;
    session
        .transform(options.key, options.rhythm)
        .context("Failed to transform score")?;

    let key = *session.key();
    let parts: Vec<Part> = match options.measure {
        None => session.parts().to_vec(),
        Some(number) => {
            if number == 0 || number > session.measure_count() {
                bail!(
                    "Measure {} is out of range, the score has {} measures",
                    number,
                    session.measure_count()
                );
            }
            session.reset();
            for _ in 1..number {
                session.step();
            }
            session
                .current_measures()
                .into_iter()
                .map(|m| vec![m.clone()])
                .collect()
        }
    };

    write_parts(out, &parts, format, key, score.time_signature)
}

#[derive(Debug, Serialize)]
pub struct ModulationReport {
    pub from: Key,
    pub to: Key,
    /// Keys passed through, both ends included
    pub keys: Vec<Key>,
    pub measures: Vec<Measure>,
}

/// Chord bridge from one key to another, packed into measures
pub fn modulate(
    from: &Key,
    to: &Key,
    beats_per_measure: u8,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<()> {
    let graph = ModulationGraph::shared();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let keys = graph
        .find_key_path(from, to)?
        .ok_or_else(|| anyhow!("No modulation path from {} to {}", from, to))?;
    let measures = graph
        .bridge(from, to, beats_per_measure, &mut rng)?
        .ok_or_else(|| anyhow!("No modulation path from {} to {}", from, to))?;
    info!(
        from = %from,
        to = %to,
        steps = keys.len() - 1,
        measures = measures.len(),
        "built modulation bridge"
    );

    write_json(
        out,
        &ModulationReport {
            from: *from,
            to: *to,
            keys,
            measures,
        },
    )
}

#[derive(Debug, Serialize)]
pub struct Neighbor {
    pub key: Key,
    pub shared: Vec<Triad>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GraphReport {
    Neighbors { key: Key, neighbors: Vec<Neighbor> },
    Edges { nodes: usize, edges: Vec<EdgeSnapshot> },
}

/// Edge listing of the whole graph, or one key's neighbourhood
pub fn graph(key: Option<&Key>, out: &mut dyn Write) -> Result<()> {
    let graph = ModulationGraph::shared();
    let report = match key {
        Some(key) => {
            if graph.node(key).is_none() {
                bail!("{} is not one of the keys in the modulation graph", key);
            }
            let neighbors = graph
                .neighbors(key)
                .into_iter()
                .map(|(key, shared)| Neighbor {
                    key,
                    shared: shared.to_vec(),
                })
                .collect();
            GraphReport::Neighbors {
                key: *key,
                neighbors,
            }
        }
        None => GraphReport::Edges {
            nodes: graph.node_count(),
            edges: graph.edges(),
        },
    };

    write_json(out, &report)
}

#[derive(Debug, Serialize)]
pub struct DurationShare {
    pub duration: QuarterLength,
    pub share: f64,
}

#[derive(Debug, Serialize)]
pub struct DurationTransition {
    pub from: QuarterLength,
    pub to: QuarterLength,
    /// Probability of `to` following `from`
    pub probability: f64,
}

#[derive(Debug, Serialize)]
pub struct PartStats {
    pub part: usize,
    pub elements: usize,
    pub durations: Vec<DurationShare>,
    pub transitions: Vec<DurationTransition>,
}

/// Duration frequencies and first-order transitions, one entry per part
pub fn stats(score: &ScoreDocument, out: &mut dyn Write) -> Result<()> {
    let report: Vec<PartStats> = score
        .parts
        .iter()
        .enumerate()
        .map(|(index, part)| {
            let elements = || part.iter().flatten();
            PartStats {
                part: index + 1,
                elements: elements().count(),
                durations: duration_stats::duration_frequencies(elements())
                    .into_iter()
                    .map(|(duration, share)| DurationShare { duration, share })
                    .collect(),
                transitions: duration_stats::duration_transitions(elements())
                    .into_iter()
                    .map(|((from, to), probability)| DurationTransition {
                        from,
                        to,
                        probability,
                    })
                    .collect(),
            }
        })
        .collect();
    info!(parts = report.len(), "computed duration statistics");

    write_json(out, &report)
}

/// Print the effective configuration, preceded by where it came from
pub fn config(config: &RefrainConfig, sources: &ConfigSources, out: &mut dyn Write) -> Result<()> {
    for path in &sources.files {
        writeln!(out, "# loaded {}", path.display())?;
    }
    for var in &sources.env_overrides {
        writeln!(out, "# overridden by ${}", var)?;
    }
    if !sources.files.is_empty() || !sources.env_overrides.is_empty() {
        writeln!(out)?;
    }
    write!(out, "{}", config.to_toml())?;
    Ok(())
}
