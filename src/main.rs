//! block-pipeline CLI entry point.
//!
//! Initializes logging, runs the block pipeline and the sweep workload.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use block_pipeline::config::{DEFAULT_SEED, ExecutionMode, ParallelOptions, PipelineConfig};
use block_pipeline::execution::{LoggingObserver, PipelineRunner};
use block_pipeline::generation::sine_sweep;
use block_pipeline::logging::{LogLevel, TracingSink};

#[derive(Debug, Parser)]
#[command(name = "block-pipeline", version, about = "Synthetic block-processing load generator")]
struct Cli {
    /// Number of blocks to process.
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    blocks: i64,

    /// Records generated per block.
    #[arg(long, default_value_t = 500, allow_negative_numbers = true)]
    block_size: i64,

    /// Seed for the noise source.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Artificial delay per square/cube computation, in nanoseconds.
    #[arg(long, default_value_t = 0)]
    item_delay_ns: u64,

    /// Minimum log level (debug, info, warn).
    #[arg(long, env = "BLOCK_PIPELINE_LOG_LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Process blocks on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads in parallel mode (defaults to available parallelism).
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Maximum blocks in flight in parallel mode.
    #[arg(long, requires = "parallel")]
    max_in_flight: Option<usize>,

    /// Length of the sine sweep run after the pipeline (0 disables it).
    #[arg(long, default_value_t = 10_000)]
    sweep: usize,

    /// Print block results as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_config(&self) -> PipelineConfig {
        let execution = if self.parallel {
            let defaults = ParallelOptions::default();
            ExecutionMode::Parallel(ParallelOptions {
                num_threads: self.threads.or(defaults.num_threads),
                max_in_flight_blocks: self
                    .max_in_flight
                    .unwrap_or(defaults.max_in_flight_blocks),
            })
        } else {
            ExecutionMode::Sequential
        };

        PipelineConfig {
            blocks: self.blocks,
            block_size: self.block_size,
            log_level: self.log_level,
            item_delay_ns: self.item_delay_ns,
            seed: Some(self.seed),
            execution,
        }
    }
}

/// Resolve the runner's minimum level and the `EnvFilter` directive.
///
/// A non-empty `RUST_LOG` wins: the runner then emits everything down to DEBUG and the filter
/// decides what is printed. Otherwise `--log-level` drives both.
fn log_levels(cli_level: LogLevel, rust_log: Option<&str>) -> (LogLevel, String) {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directive) => (LogLevel::Debug, directive.to_string()),
        None => (cli_level, cli_level.as_filter().to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --log-level CLI arg
    let rust_log = std::env::var("RUST_LOG").ok();
    let (runner_level, directive) = log_levels(cli.log_level, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = PipelineConfig {
        log_level: runner_level,
        ..cli.to_config()
    };
    let runner = PipelineRunner::new(config, Arc::new(TracingSink))
        .context("failed to build pipeline runner")?;
    let logger = runner.logger().clone();
    let runner = runner.with_observer(Arc::new(LoggingObserver::new(logger.clone())));

    logger.info("Starting pipeline execution");
    let results = runner.run_configured().context("pipeline run failed")?;
    let values = sine_sweep(cli.sweep, &logger);

    logger.info(&format!("Generated {} block summaries", results.len()));
    logger.info(&format!("Generated {} sweep values", values.len()));
    logger.info(&format!("Metrics: {}", runner.metrics().snapshot()));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    logger.info("Execution completed");
    Ok(())
}
