//! Record generation.
//!
//! - [`RecordGenerator`]: builds the [`crate::types::Record`]s of a block
//! - [`RandomSource`] / [`SeededRandom`]: the noise source for `noisy` values
//! - [`sine_sweep()`]: the standalone sweep workload
//!
//! ## Example
//!
//! ```rust
//! use block_pipeline::generation::{RecordGenerator, SeededRandom};
//!
//! let mut generator = RecordGenerator::new(SeededRandom::new(42));
//! let records = generator.generate(0, 10).unwrap();
//! assert_eq!(records.len(), 10);
//! assert_eq!(records[4].square, 16);
//! assert_eq!(records[4].cube, 64);
//! ```

mod random;
mod records;
mod sweep;

pub use random::{RandomSource, SeededRandom};
pub use records::{NOISE_AMPLITUDE, REFERENCE_ITEM_DELAY, RecordGenerator, slow_cube, slow_square};
pub use sweep::sine_sweep;
