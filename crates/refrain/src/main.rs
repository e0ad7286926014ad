//! refrain - transform symbolic scores from the command line
//!
//! Subcommands:
//! - `refrain transpose --key <key> <score>` - Move a score to another key
//! - `refrain ostinato --rhythm <rhythm> <score>` - Re-rhythm a score
//! - `refrain transform [--key <key>] [--rhythm <rhythm>] <score>` - Both at once
//! - `refrain modulate --from <key> --to <key>` - Chord bridge between keys
//! - `refrain graph [--key <key>]` - Inspect the common-chord graph
//! - `refrain stats <score>` - Duration statistics per part
//! - `refrain config` - Show the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notation::Key;
use refrain::commands::{self, TransformOptions};
use refrain::io::{read_score, OutputFormat};
use refrain::telemetry;
use refrainconf::RefrainConfig;
use tracing::debug;
use transform::Rhythm;

#[derive(Parser)]
#[command(name = "refrain")]
#[command(about = "Transpose, re-rhythm and modulate symbolic scores")]
#[command(version)]
struct Cli {
    /// Config file to load in place of ./refrain.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output form for score results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Score)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move a score to another key, keeping scale degrees
    Transpose {
        /// Target key (e.g., "a minor", "e- major", "F#m")
        #[arg(short, long)]
        key: Key,

        /// Score JSON file, or - for stdin
        score: PathBuf,
    },

    /// Redistribute each measure over an ostinato rhythm
    Ostinato {
        /// Attacks per beat (e.g., "2,2,3,4" or "2234"); defaults to config
        #[arg(short, long)]
        rhythm: Option<Rhythm>,

        /// Score JSON file, or - for stdin
        score: PathBuf,
    },

    /// Change key and rhythm together through a cached session
    Transform {
        /// Target key; defaults to config
        #[arg(short, long)]
        key: Option<Key>,

        /// Attacks per beat, or "original"; defaults to config
        #[arg(short, long)]
        rhythm: Option<String>,

        /// Only print this measure (1-based) of each part
        #[arg(short, long)]
        measure: Option<usize>,

        /// Score JSON file, or - for stdin
        score: PathBuf,
    },

    /// Build a chord bridge from one key to another
    Modulate {
        /// Starting key
        #[arg(long)]
        from: Key,

        /// Destination key
        #[arg(long)]
        to: Key,

        /// Beats per measure for the bridge; defaults to config
        #[arg(short, long)]
        beats: Option<u8>,

        /// Seed for seventh-chord choice; defaults to config, then entropy
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List graph edges, or the neighbours of one key
    Graph {
        #[arg(short, long)]
        key: Option<Key>,
    },

    /// Duration frequencies and transitions for each part
    Stats {
        /// Score JSON file, or - for stdin
        score: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = RefrainConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    telemetry::init(&config.telemetry.log_level)?;
    debug!(
        files = ?sources.files,
        env = ?sources.env_overrides,
        "loaded configuration"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Transpose { key, score } => {
            let document = read_score(&score)?;
            commands::transpose(&document, &key, cli.format, &mut out)?;
        }
        Commands::Ostinato { rhythm, score } => {
            let rhythm = match rhythm {
                Some(rhythm) => rhythm,
                None => config
                    .defaults
                    .rhythm
                    .as_deref()
                    .context("No rhythm given and none configured in [defaults]")?
                    .parse()
                    .context("Invalid rhythm in [defaults]")?,
            };
            let document = read_score(&score)?;
            commands::ostinato(&document, &rhythm, cli.format, &mut out)?;
        }
        Commands::Transform {
            key,
            rhythm,
            measure,
            score,
        } => {
            let key = match key {
                Some(key) => key,
                None => config
                    .defaults
                    .key
                    .parse()
                    .context("Invalid key in [defaults]")?,
            };
            let rhythm = rhythm
                .or_else(|| config.defaults.rhythm.clone())
                .map(|r| commands::parse_rhythm_choice(&r))
                .transpose()?;
            let options = TransformOptions {
                key: Some(key),
                rhythm,
                cache_capacity: config.cache.capacity,
                measure,
            };
            let document = read_score(&score)?;
            commands::transform(&document, &options, cli.format, &mut out)?;
        }
        Commands::Modulate {
            from,
            to,
            beats,
            seed,
        } => {
            let beats = beats.unwrap_or(config.defaults.beats_per_measure);
            let seed = seed.or(config.modulation.seed);
            commands::modulate(&from, &to, beats, seed, &mut out)?;
        }
        Commands::Graph { key } => {
            commands::graph(key.as_ref(), &mut out)?;
        }
        Commands::Stats { score } => {
            let document = read_score(&score)?;
            commands::stats(&document, &mut out)?;
        }
        Commands::Config => {
            commands::config(&config, &sources, &mut out)?;
        }
    }

    Ok(())
}
