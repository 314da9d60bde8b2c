//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is built once (from [`Default`], [`PipelineConfig::reference`], JSON, or
//! CLI flags) and handed to [`crate::execution::PipelineRunner::new`]. Nothing reads
//! configuration from global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::generation::REFERENCE_ITEM_DELAY;
use crate::logging::LogLevel;

/// Default number of blocks per run.
pub const DEFAULT_BLOCKS: i64 = 5;
/// Default number of records generated per block.
pub const DEFAULT_BLOCK_SIZE: i64 = 500;
/// Default noise seed.
pub const DEFAULT_SEED: u64 = 42;

/// Settings for parallel block execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on blocks processed concurrently.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_blocks: usize,
}

impl ParallelOptions {
    /// Resolved worker thread count.
    pub fn threads(&self) -> usize {
        self.num_threads.unwrap_or_else(available_parallelism).max(1)
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        let n = available_parallelism();
        Self {
            num_threads: Some(n),
            max_in_flight_blocks: n,
        }
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// How blocks are scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One block at a time, in block-id order.
    #[default]
    Sequential,
    /// Blocks on a dedicated thread pool; results are still returned in block-id order.
    Parallel(ParallelOptions),
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub blocks: i64,
    pub block_size: i64,
    /// Minimum level forwarded to the log sink.
    pub log_level: LogLevel,
    /// Artificial delay per square/cube computation, in nanoseconds.
    pub item_delay_ns: u64,
    /// Seed for the noise source. `None` draws a fresh seed per block.
    pub seed: Option<u64>,
    pub execution: ExecutionMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blocks: DEFAULT_BLOCKS,
            block_size: DEFAULT_BLOCK_SIZE,
            log_level: LogLevel::Info,
            item_delay_ns: 0,
            seed: Some(DEFAULT_SEED),
            execution: ExecutionMode::Sequential,
        }
    }
}

impl PipelineConfig {
    /// The reference load: defaults plus the reference per-item delay.
    pub fn reference() -> Self {
        Self {
            item_delay_ns: REFERENCE_ITEM_DELAY.as_nanos() as u64,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> PipelineResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_nanos(self.item_delay_ns)
    }

    /// Reject negative counts and zero-sized parallel settings.
    pub fn validate(&self) -> PipelineResult<()> {
        PipelineError::non_negative("blocks", self.blocks)?;
        PipelineError::non_negative("block_size", self.block_size)?;
        if let ExecutionMode::Parallel(opts) = &self.execution {
            if opts.num_threads == Some(0) {
                return Err(PipelineError::InvalidConfig {
                    message: "num_threads must be > 0 when set".to_string(),
                });
            }
            if opts.max_in_flight_blocks == 0 {
                return Err(PipelineError::InvalidConfig {
                    message: "max_in_flight_blocks must be > 0".to_string(),
                });
            }
        }
        Ok(())
    }
}
