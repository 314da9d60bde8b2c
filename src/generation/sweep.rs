//! Linear `i * sin(i)` sweep run after the block pipeline.

use crate::logging::Logger;

const PROGRESS_EVERY: usize = 500;

/// Computes `i * sin(i)` for `i` in `0..n`, logging INFO progress every 500 iterations.
pub fn sine_sweep(n: usize, logger: &Logger) -> Vec<f64> {
    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f64;
        values.push(x * x.sin());
        if i % PROGRESS_EVERY == 0 {
            logger.info(&format!("sweep progress: {i}"));
        }
    }
    values
}
