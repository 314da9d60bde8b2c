//! Per-index record generation.

use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};
use crate::logging::{LogLevel, Logger};
use crate::types::Record;

use super::random::RandomSource;

/// Half-width of the interval the noisy value is perturbed by.
pub const NOISE_AMPLITUDE: f64 = 0.01;

/// Delay applied per square/cube computation in the reference run (123.4 µs).
pub const REFERENCE_ITEM_DELAY: Duration = Duration::from_nanos(123_400);

/// A DEBUG progress line is logged every this many indices.
const DEBUG_PROGRESS_EVERY: i64 = 100;

const MAX_PREALLOCATED_RECORDS: usize = 1 << 16;

/// Generates the records of a block.
///
/// Square and cube are each computed after an optional artificial delay that simulates
/// expensive work. With the default zero delay generation is pure CPU.
#[derive(Debug)]
pub struct RecordGenerator<R> {
    random: R,
    item_delay: Duration,
    logger: Logger,
}

impl<R: RandomSource> RecordGenerator<R> {
    /// Create a generator drawing noise from `random`, with no delay and no logging.
    pub fn new(random: R) -> Self {
        Self {
            random,
            item_delay: Duration::ZERO,
            logger: Logger::disabled(),
        }
    }

    /// Sleep for `delay` before each square and cube computation.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Attach a logger for per-item DEBUG progress.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Generate records for indices `0..size` of block `block_id`.
    ///
    /// Returns [`PipelineError::NegativeParameter`] if `size < 0` and
    /// [`PipelineError::Overflow`] if an index's cube does not fit in `i64`.
    pub fn generate(&mut self, block_id: i64, size: i64) -> PipelineResult<Vec<Record>> {
        let size = PipelineError::non_negative("block_size", size)?;
        let mut out = Vec::with_capacity((size as usize).min(MAX_PREALLOCATED_RECORDS));
        for i in 0..size {
            out.push(self.record_at(block_id, i)?);
            if i % DEBUG_PROGRESS_EVERY == 0 && self.logger.enabled(LogLevel::Debug) {
                self.logger.debug(&format!("block={block_id}, i={i}"));
            }
        }
        Ok(out)
    }

    /// Compute the record for a single index.
    pub fn record_at(&mut self, block_id: i64, index: i64) -> PipelineResult<Record> {
        let index = PipelineError::non_negative("index", index)?;
        let square = slow_square(index, self.item_delay)?;
        let cube = slow_cube(index, self.item_delay)?;
        let noisy = square as f64 + self.random.uniform(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
        Ok(Record {
            block_id,
            index,
            square,
            cube,
            sqrt: (index as f64).sqrt(),
            noisy,
        })
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

/// `x * x`, after sleeping for `delay`.
pub fn slow_square(x: i64, delay: Duration) -> PipelineResult<i64> {
    pause(delay);
    x.checked_mul(x).ok_or(PipelineError::Overflow {
        quantity: "square",
        index: x,
    })
}

/// `x * x * x`, after sleeping for `delay`.
pub fn slow_cube(x: i64, delay: Duration) -> PipelineResult<i64> {
    pause(delay);
    x.checked_mul(x)
        .and_then(|sq| sq.checked_mul(x))
        .ok_or(PipelineError::Overflow {
            quantity: "cube",
            index: x,
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::{NOISE_AMPLITUDE, RecordGenerator};
    use crate::error::PipelineError;
    use crate::generation::{RandomSource, SeededRandom};
    use crate::logging::{LogLevel, LogSink, Logger};

    struct FixedNoise(f64);

    impl RandomSource for FixedNoise {
        fn uniform(&mut self, _low: f64, _high: f64) -> f64 {
            self.0
        }
    }

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LogSink for Lines {
        fn log(&self, _level: LogLevel, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn square_and_cube_are_exact() {
        let mut g = RecordGenerator::new(FixedNoise(0.0));
        for i in [0_i64, 1, 2, 3, 7, 499, 1_000, 65_536, 2_097_151] {
            let r = g.record_at(3, i).unwrap();
            assert_eq!(r.block_id, 3);
            assert_eq!(r.index, i);
            assert_eq!(r.square, i * i);
            assert_eq!(r.cube, i * i * i);
            assert_eq!(r.sqrt, (i as f64).sqrt());
        }
    }

    #[test]
    fn generate_yields_sequential_indices() {
        let mut g = RecordGenerator::new(FixedNoise(0.005));
        let recs = g.generate(0, 5).unwrap();
        let indices: Vec<i64> = recs.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!((recs[4].noisy - 16.005).abs() < 1e-12);
    }

    #[test]
    fn noisy_stays_within_amplitude_of_square() {
        let mut g = RecordGenerator::new(SeededRandom::new(42));
        for r in g.generate(0, 200).unwrap() {
            assert!((r.noisy - r.square as f64).abs() <= NOISE_AMPLITUDE + 1e-9);
        }
    }

    #[test]
    fn zero_size_is_empty() {
        let mut g = RecordGenerator::new(FixedNoise(0.0));
        assert!(g.generate(0, 0).unwrap().is_empty());
    }

    #[test]
    fn negative_size_is_rejected() {
        let mut g = RecordGenerator::new(FixedNoise(0.0));
        let err = g.generate(0, -1).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::NegativeParameter {
                name: "block_size",
                value: -1
            }
        ));
    }

    #[test]
    fn cube_overflow_is_fatal() {
        let mut g = RecordGenerator::new(FixedNoise(0.0));
        let err = g.record_at(0, 2_097_152).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Overflow {
                quantity: "cube",
                index: 2_097_152
            }
        ));
    }

    #[test]
    fn debug_progress_every_hundred_items() {
        let lines = Arc::new(Lines::default());
        let mut g = RecordGenerator::new(FixedNoise(0.0))
            .with_logger(Logger::new(lines.clone(), LogLevel::Debug));
        g.generate(7, 250).unwrap();
        assert_eq!(
            *lines.0.lock().unwrap(),
            vec!["block=7, i=0", "block=7, i=100", "block=7, i=200"]
        );
    }

    #[test]
    fn item_delay_is_applied_per_computation() {
        let mut g =
            RecordGenerator::new(FixedNoise(0.0)).with_item_delay(Duration::from_millis(1));
        let start = Instant::now();
        g.generate(0, 3).unwrap();
        // 3 items x (square + cube)
        assert!(start.elapsed() >= Duration::from_millis(6));
    }
}
