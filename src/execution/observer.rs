use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::logging::{LogLevel, Logger};
use crate::types::Summary;

/// A step in a block's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    FilterEvenSquare,
    FilterCubeDiv3,
    Score,
}

/// Execution events emitted by the runner.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    RunStarted { blocks: i64, block_size: i64 },
    ThrottleWaited { duration: Duration },
    BlockStarted { block_id: i64 },
    StageFinished {
        block_id: i64,
        stage: Stage,
        input_records: usize,
        output_records: usize,
    },
    BlockFinished { block_id: i64, summary: Summary },
    RunFailed { error: String },
    RunFinished {
        elapsed: Duration,
        metrics: PipelineMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Writes every event to a [`Logger`] at DEBUG level.
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    logger: Logger,
}

impl LoggingObserver {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl PipelineObserver for LoggingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        if self.logger.enabled(LogLevel::Debug) {
            self.logger.debug(&format!("{event:?}"));
        }
    }
}

/// Real-time metrics for a pipeline run.
///
/// The runner updates these counters during execution; callers can snapshot them at any time.
pub struct PipelineMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    blocks_started: AtomicU64,
    blocks_finished: AtomicU64,
    records_generated: AtomicU64,
    records_retained: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_blocks: AtomicUsize,
    max_active_blocks: AtomicUsize,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            blocks_started: AtomicU64::new(0),
            blocks_finished: AtomicU64::new(0),
            records_generated: AtomicU64::new(0),
            records_retained: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_blocks: AtomicUsize::new(0),
            max_active_blocks: AtomicUsize::new(0),
        }
    }

    /// Bump the run id and reset all per-run counters.
    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.blocks_started.store(0, Ordering::SeqCst);
        self.blocks_finished.store(0, Ordering::SeqCst);
        self.records_generated.store(0, Ordering::SeqCst);
        self.records_retained.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_blocks.store(0, Ordering::SeqCst);
        self.max_active_blocks.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub fn on_block_start(&self) {
        let _ = self.blocks_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_blocks.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.max_active_blocks.fetch_max(now, Ordering::SeqCst);
    }

    /// Called when a block leaves the pipeline, successfully or not.
    pub fn on_block_end(&self, finished: bool) {
        if finished {
            let _ = self.blocks_finished.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self.active_blocks.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn on_records_generated(&self, n: usize) {
        let _ = self.records_generated.fetch_add(n as u64, Ordering::SeqCst);
    }

    pub fn on_records_retained(&self, n: usize) {
        let _ = self.records_retained.fetch_add(n as u64, Ordering::SeqCst);
    }

    pub fn on_throttle_wait(&self, d: Duration) {
        let _ = self
            .throttle_wait_ns
            .fetch_add(saturating_nanos(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> PipelineMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        PipelineMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            blocks_started: self.blocks_started.load(Ordering::SeqCst),
            blocks_finished: self.blocks_finished.load(Ordering::SeqCst),
            records_generated: self.records_generated.load(Ordering::SeqCst),
            records_retained: self.records_retained.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_blocks: self.max_active_blocks.load(Ordering::SeqCst),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`PipelineMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub blocks_started: u64,
    pub blocks_finished: u64,
    pub records_generated: u64,
    /// Records that survived both filters.
    pub records_retained: u64,
    pub throttle_wait: Duration,
    pub max_active_blocks: usize,
}

impl fmt::Display for PipelineMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, blocks={}/{}, records={}/{}, max_active_blocks={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.blocks_finished,
            self.blocks_started,
            self.records_retained,
            self.records_generated,
            self.max_active_blocks,
            self.throttle_wait,
            self.elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::PipelineMetrics;

    #[test]
    fn begin_run_resets_counters_and_bumps_run_id() {
        let m = PipelineMetrics::new();
        m.begin_run();
        m.on_block_start();
        m.on_records_generated(10);
        m.on_records_retained(2);
        m.on_block_end(true);
        m.end_run(Duration::from_millis(5));

        let first = m.snapshot();
        assert_eq!(first.run_id, 1);
        assert_eq!(first.blocks_finished, 1);
        assert_eq!(first.records_generated, 10);
        assert_eq!(first.elapsed, Some(Duration::from_millis(5)));

        m.begin_run();
        let second = m.snapshot();
        assert_eq!(second.run_id, 2);
        assert_eq!(second.blocks_started, 0);
        assert_eq!(second.records_generated, 0);
        assert_eq!(second.elapsed, None);
    }

    #[test]
    fn max_active_tracks_overlap() {
        let m = PipelineMetrics::new();
        m.begin_run();
        m.on_block_start();
        m.on_block_start();
        m.on_block_end(true);
        m.on_block_start();
        m.on_block_end(false);
        m.on_block_end(true);

        let snap = m.snapshot();
        assert_eq!(snap.max_active_blocks, 2);
        assert_eq!(snap.blocks_started, 3);
        assert_eq!(snap.blocks_finished, 2);
    }
}
