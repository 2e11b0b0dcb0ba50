//! StratEval CLI
//!
//! Run the Monte Carlo comparison of SOP, ML and A* across urban, suburban
//! and airport environments.

use clap::Parser;
use std::sync::Arc;
use strateval_core::{NoiseConfig, SamplerKind, ScoreMatrix};
use strateval_env::{ExecutionContext, TokioContext};
use strateval_sim::{render_tables, Orchestrator, RunError, RunExport, SeededContext, SimConfig};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// StratEval Monte Carlo CLI
#[derive(Parser, Debug)]
#[command(name = "strateval")]
#[command(about = "Monte Carlo evaluation of decision strategies", long_about = None)]
struct Args {
    /// Total trials, split across all units
    #[arg(short, long, default_value = "1000")]
    iterations: u64,

    /// Noise standard deviation for SOP
    #[arg(long, default_value = "0.1")]
    sop: f64,

    /// Noise standard deviation for ML
    #[arg(long, default_value = "0.1")]
    ml: f64,

    /// Noise standard deviation for A*
    #[arg(long, default_value = "0.1")]
    astar: f64,

    /// Master seed for reproducible runs (0 = OS entropy)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Number of parallel units (default: hardware parallelism, or 4 when seeded)
    #[arg(short, long)]
    units: Option<usize>,

    /// Score matrix JSON file (default: built-in reference table)
    #[arg(short, long)]
    matrix: Option<String>,

    /// Gaussian noise source (box-muller, ziggurat)
    #[arg(long, default_value = "box-muller")]
    sampler: SamplerKind,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output instead of tables
    #[arg(long)]
    json: bool,

    /// Export the full run (statistics and chart series) to a JSON file
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    fn config(&self) -> SimConfig {
        SimConfig {
            total_iterations: self.iterations,
            noise: NoiseConfig::new(self.sop, self.ml, self.astar),
            seed: self.seed,
            units: self.units,
            sampler: self.sampler,
        }
    }
}

/// `RUST_LOG` when set, otherwise INFO (DEBUG with `--verbose`).
fn log_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Runs once on the given context and prints/exports the result.
async fn execute<C: ExecutionContext>(
    ctx: Arc<C>,
    matrix: Arc<ScoreMatrix>,
    config: &SimConfig,
    args: &Args,
) -> Result<(), RunError> {
    info!(
        "Running {} iterations on {} units (seed={}, sampler={})",
        config.total_iterations,
        ctx.parallelism(),
        ctx.seed(),
        config.sampler
    );

    let mut orchestrator = Orchestrator::new(ctx, matrix).with_sampler(config.sampler);

    let mut next_milestone = 0.25;
    let result = orchestrator
        .run(config.total_iterations, config.noise, |fraction| {
            debug!("  progress {:.1}%", fraction * 100.0);
            if fraction >= next_milestone {
                info!("Progress: {:.0}%", fraction * 100.0);
                while next_milestone <= fraction {
                    next_milestone += 0.25;
                }
            }
        })
        .await?;

    let export = RunExport::new(&result, config.noise, config.seed);

    if args.json {
        let json = export.to_json_pretty().map_err(std::io::Error::from)?;
        println!("{}", json);
    } else {
        println!("{}", render_tables(&result));
    }

    if let Some(path) = &args.export {
        export.write_to_file(path)?;
        info!("Exported results to {}", path);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(args.verbose))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = args.config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let matrix = match &args.matrix {
        Some(path) => match ScoreMatrix::load(path) {
            Ok(matrix) => matrix,
            Err(e) => {
                error!("Failed to load score matrix {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ScoreMatrix::builtin(),
    };
    let matrix = Arc::new(matrix);

    let outcome = if config.is_seeded() {
        let ctx = match config.units {
            Some(units) => SeededContext::with_parallelism(config.seed, units),
            None => Ok(SeededContext::new(config.seed)),
        };
        match ctx {
            Ok(ctx) => execute(Arc::new(ctx), matrix, &config, &args).await,
            Err(e) => Err(e.into()),
        }
    } else {
        let ctx = match config.units {
            Some(units) => TokioContext::with_parallelism(units),
            None => Ok(TokioContext::new()),
        };
        match ctx {
            Ok(ctx) => execute(Arc::new(ctx), matrix, &config, &args).await,
            Err(e) => Err(e.into()),
        }
    };

    // Exit with proper code for scripts
    if let Err(e) = outcome {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults_match_sim_config() {
        let args = Args::parse_from(["strateval"]);
        let config = args.config();
        let defaults = SimConfig::default();

        assert_eq!(config.total_iterations, defaults.total_iterations);
        assert_eq!(config.noise, defaults.noise);
        assert_eq!(config.seed, defaults.seed);
        assert_eq!(config.units, defaults.units);
        assert_eq!(config.sampler, defaults.sampler);
        assert!(!config.is_seeded());
    }

    #[test]
    fn test_verbose_selects_debug_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(log_filter(true).to_string(), "debug");
        assert_eq!(log_filter(false).to_string(), "info");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_export_is_an_error() {
        let args = Args::parse_from([
            "strateval",
            "--iterations",
            "40",
            "--seed",
            "3",
            "--export",
            "/nonexistent-strateval-dir/run.json",
        ]);
        let config = args.config();
        let ctx = Arc::new(SeededContext::new(config.seed));

        let err = execute(ctx, Arc::new(ScoreMatrix::builtin()), &config, &args)
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Export(_)));
    }
}
