//! tideline: daily series alignment, correlation and chart geometry.
//!
//! Reads JSON arrays of raw samples (`{"timestamp": ..., "value": ...}`).
//!
//! Run: `tideline correlate --primary mood.json --secondary weather.json`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tideline::animate::driver::drive;
use tideline::prelude::*;

/// tideline: daily series alignment, correlation and chart geometry
#[derive(Parser, Debug)]
#[command(name = "tideline")]
#[command(version)]
#[command(about = "Align, correlate and chart daily wellness and savings series", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pair two series and score how they move together
    Correlate {
        /// Primary series (JSON)
        #[arg(long)]
        primary: PathBuf,

        /// Secondary series (JSON)
        #[arg(long)]
        secondary: PathBuf,

        /// Pairing window in hours (overrides config)
        #[arg(long)]
        tolerance_hours: Option<i64>,

        /// Primary domain: mood, temperature or MIN:MAX
        #[arg(long)]
        primary_domain: Option<ValueDomain>,

        /// Secondary domain: mood, temperature or MIN:MAX
        #[arg(long)]
        secondary_domain: Option<ValueDomain>,
    },

    /// Print chart geometry for one series as JSON
    Chart {
        /// Input series (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Chart kind: bar or line (overrides config)
        #[arg(long)]
        kind: Option<ChartKind>,

        /// Chart height (overrides config)
        #[arg(long)]
        height: Option<f32>,

        /// Chart width (overrides config)
        #[arg(long)]
        width: Option<f32>,

        /// Fixed domain: mood, temperature or MIN:MAX
        #[arg(long)]
        domain: Option<ValueDomain>,
    },

    /// Count up to the series total
    Count {
        /// Input series (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Animation length in milliseconds (overrides config)
        #[arg(long)]
        duration_ms: Option<u64>,

        /// Play the ramp in real time instead of printing it at once
        #[arg(long)]
        live: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Correlate { primary, secondary, tolerance_hours, primary_domain, secondary_domain } => {
            let normalizer = config.normalizer();
            let primary = read_series(&normalizer, &primary)?;
            let secondary = read_series(&normalizer, &secondary)?;

            let mut aligner = config.aligner();
            if let Some(hours) = tolerance_hours {
                aligner = aligner.tolerance(chrono::Duration::hours(hours));
            }
            let options = AnalysisOptions {
                aligner,
                mapper: config.chart_mapper().kind(ChartKind::Line),
                primary_domain,
                secondary_domain,
            };
            let analysis = PairedAnalysis::compute(&primary, &secondary, &options);

            if analysis.is_insufficient() {
                println!("not enough overlapping data ({} pairs)", analysis.pairs.len());
            } else {
                let result = analysis.correlation;
                println!("pairs:    {}", result.sample_count);
                println!("score:    {:+.3}", result.score);
                println!("impact:   {}", result.label);
                println!("coherence: {:+.3}", result.coherence);
                println!("strength: {:?}", result.strength());
            }
        }
        Command::Chart { input, kind, height, width, domain } => {
            let series = read_series(&config.normalizer(), &input)?;
            let mut mapper = config.chart_mapper().maybe_domain(domain);
            if let Some(kind) = kind {
                mapper = mapper.kind(kind);
            }
            if let Some(height) = height {
                mapper = mapper.height(height);
            }
            if let Some(width) = width {
                mapper = mapper.width(width);
            }
            let geometry = mapper.map(&series);
            info!(points = geometry.len(), kind = ?geometry.kind(), "mapped series");
            println!("{}", serde_json::to_string_pretty(&geometry)?);
        }
        Command::Count { input, duration_ms, live } => {
            let series = read_series(&config.normalizer(), &input)?;
            let duration = duration_ms.map_or_else(|| config.animation_duration(), Duration::from_millis);
            let ramp = Ramp::with_tick(series.total(), duration, config.tick_interval());

            if live {
                let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
                runtime.block_on(drive(ramp, |v| println!("{v}")));
            } else {
                for value in ramp {
                    println!("{value}");
                }
            }
        }
    }

    Ok(())
}

fn read_series(normalizer: &Normalizer, path: &Path) -> Result<Series> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<RawSample> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    let read = raw.len();
    let series = normalizer.normalize(raw);
    info!(path = %path.display(), read, days = series.len(), "loaded series");
    Ok(series)
}

/// Install the stderr subscriber. Returns false if one was already set.
fn init_logging(verbose: bool) -> bool {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    match tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init() {
        Ok(()) => true,
        Err(err) => {
            eprintln!("warning: logging not initialized: {err}");
            false
        }
    }
}
