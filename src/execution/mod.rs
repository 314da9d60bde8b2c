//! Block pipeline execution.
//!
//! [`PipelineRunner`] drives each block through
//! generate → [`filter_even_square`] → [`filter_cube_div3`] → [`add_score`] → [`aggregate`]
//! and collects one [`BlockResult`] per block, in block-id order.
//!
//! On top of the stages it provides:
//!
//! - Sequential or parallel (per-block) scheduling, see [`ExecutionMode`]
//! - A bound on in-flight blocks in parallel mode
//! - Real-time metrics + observer hooks for monitoring
//!
//! The first error from any block aborts the run and is returned; no partial results are kept.

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::config::{ExecutionMode, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::generation::{RecordGenerator, SeededRandom};
use crate::logging::{LogSink, Logger, NullSink};
use crate::processing::{add_score, aggregate, filter_cube_div3, filter_even_square};
use crate::types::BlockResult;

pub use observer::{
    LoggingObserver, PipelineEvent, PipelineMetrics, PipelineMetricsSnapshot, PipelineObserver,
    Stage,
};

use semaphore::Semaphore;

/// Runs blocks through the pipeline stages.
pub struct PipelineRunner {
    config: PipelineConfig,
    logger: Logger,
    pool: Option<ThreadPool>,
    observer: Option<Arc<dyn PipelineObserver>>,
    metrics: Arc<PipelineMetrics>,
}

impl PipelineRunner {
    /// Create a runner that logs to `sink` at the configured level.
    ///
    /// Validates `config` and, in parallel mode, builds the worker pool.
    pub fn new(config: PipelineConfig, sink: Arc<dyn LogSink>) -> PipelineResult<Self> {
        config.validate()?;
        let logger = Logger::new(sink, config.log_level);
        let pool = match &config.execution {
            ExecutionMode::Sequential => None,
            ExecutionMode::Parallel(opts) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(opts.threads())
                    .thread_name(|i| format!("block-pipeline-{i}"))
                    .build()?,
            ),
        };

        Ok(Self {
            config,
            logger,
            pool,
            observer: None,
            metrics: Arc::new(PipelineMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Run with the block count and size from the configuration.
    pub fn run_configured(&self) -> PipelineResult<Vec<BlockResult>> {
        self.run(self.config.blocks, self.config.block_size)
    }

    /// Process blocks `0..blocks`, each with `block_size` records.
    ///
    /// Results are ordered by ascending block id regardless of execution mode.
    pub fn run(&self, blocks: i64, block_size: i64) -> PipelineResult<Vec<BlockResult>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(PipelineEvent::RunStarted { blocks, block_size });

        let outcome = self.run_blocks(blocks, block_size);

        self.metrics.end_run(start.elapsed());
        match &outcome {
            Ok(_) => self.emit(PipelineEvent::RunFinished {
                elapsed: start.elapsed(),
                metrics: self.metrics.snapshot(),
            }),
            Err(e) => {
                self.logger.warn(&format!("Pipeline aborted: {e}"));
                self.emit(PipelineEvent::RunFailed {
                    error: e.to_string(),
                });
            }
        }
        outcome
    }

    fn run_blocks(&self, blocks: i64, block_size: i64) -> PipelineResult<Vec<BlockResult>> {
        self.run_blocks_with(blocks, block_size, |block_id, size| {
            self.run_block(block_id, size)
        })
    }

    /// Schedules `process` over blocks `0..blocks` per the execution mode.
    pub(crate) fn run_blocks_with<F>(
        &self,
        blocks: i64,
        block_size: i64,
        process: F,
    ) -> PipelineResult<Vec<BlockResult>>
    where
        F: Fn(i64, i64) -> PipelineResult<BlockResult> + Sync,
    {
        let blocks = PipelineError::non_negative("blocks", blocks)?;
        let block_size = PipelineError::non_negative("block_size", block_size)?;

        match (&self.pool, &self.config.execution) {
            (Some(pool), ExecutionMode::Parallel(opts)) => {
                let sem = Semaphore::new(opts.max_in_flight_blocks);
                pool.install(|| {
                    (0..blocks)
                        .into_par_iter()
                        .map(|block_id| {
                            let (_permit, waited) = sem.acquire();
                            if waited > Duration::ZERO {
                                self.metrics.on_throttle_wait(waited);
                                self.emit(PipelineEvent::ThrottleWaited { duration: waited });
                            }
                            process(block_id, block_size)
                        })
                        .collect::<PipelineResult<Vec<_>>>()
                })
            }
            _ => (0..blocks)
                .map(|block_id| process(block_id, block_size))
                .collect(),
        }
    }

    /// Run a single block through every stage.
    pub fn run_block(&self, block_id: i64, block_size: i64) -> PipelineResult<BlockResult> {
        self.metrics.on_block_start();
        self.emit(PipelineEvent::BlockStarted { block_id });

        let out = self.process_block(block_id, block_size);
        self.metrics.on_block_end(out.is_ok());
        out
    }

    fn process_block(&self, block_id: i64, block_size: i64) -> PipelineResult<BlockResult> {
        self.logger.info(&format!("Computing block {block_id}"));

        let mut generator = RecordGenerator::new(self.random_for(block_id))
            .with_item_delay(self.config.item_delay())
            .with_logger(self.logger.clone());
        let records = generator.generate(block_id, block_size)?;
        self.metrics.on_records_generated(records.len());
        self.stage_finished(block_id, Stage::Generate, block_size as usize, records.len());

        let even = filter_even_square(&records);
        self.stage_finished(block_id, Stage::FilterEvenSquare, records.len(), even.len());

        let div3 = filter_cube_div3(&even);
        self.stage_finished(block_id, Stage::FilterCubeDiv3, even.len(), div3.len());

        let scored = add_score(&div3);
        self.stage_finished(block_id, Stage::Score, div3.len(), scored.len());

        let summary = aggregate(&scored)?;
        self.metrics.on_records_retained(summary.count);
        self.logger
            .info(&format!("Block {block_id} summary: {summary}"));
        self.emit(PipelineEvent::BlockFinished { block_id, summary });

        Ok(BlockResult { block_id, summary })
    }

    fn random_for(&self, block_id: i64) -> SeededRandom {
        match self.config.seed {
            Some(seed) => SeededRandom::for_block(seed, block_id),
            None => SeededRandom::from_entropy(),
        }
    }

    fn stage_finished(&self, block_id: i64, stage: Stage, input: usize, output: usize) {
        self.emit(PipelineEvent::StageFinished {
            block_id,
            stage,
            input_records: input,
            output_records: output,
        });
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// Run `blocks` blocks of `block_size` records with the default configuration and no logging.
pub fn run(blocks: i64, block_size: i64) -> PipelineResult<Vec<BlockResult>> {
    PipelineRunner::new(PipelineConfig::default(), Arc::new(NullSink))?.run(blocks, block_size)
}
