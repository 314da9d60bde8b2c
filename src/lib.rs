//! `block-pipeline` is a synthetic data-processing pipeline for generating computational load.
//!
//! Each block generates one [`types::Record`] per index (square, cube, square root and a noisy
//! square), narrows the records through two filter stages, scores the survivors and reduces
//! them to a [`types::Summary`]. The run yields one [`types::BlockResult`] per block.
//!
//! The primary entrypoint is [`execution::PipelineRunner`], configured by a
//! [`config::PipelineConfig`] and logging through an injected [`logging::LogSink`].
//!
//! ## Quick example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use block_pipeline::config::PipelineConfig;
//! use block_pipeline::execution::PipelineRunner;
//! use block_pipeline::logging::NullSink;
//!
//! # fn main() -> Result<(), block_pipeline::PipelineError> {
//! let runner = PipelineRunner::new(PipelineConfig::default(), Arc::new(NullSink))?;
//! let results = runner.run(1, 10)?;
//!
//! // Of indices 0..10 only 0 and 6 have an even square and a cube divisible by 3.
//! assert_eq!(results[0].summary.count, 2);
//! assert_eq!(results[0].summary.square_sum, 36);
//! assert_eq!(results[0].summary.cube_sum, 216);
//! # Ok(())
//! # }
//! ```
//!
//! ## Stages
//!
//! | Stage | Function | Keeps / produces |
//! |---|---|---|
//! | generate | [`generation::RecordGenerator::generate`] | one record per index `0..size` |
//! | filter A | [`processing::filter_even_square`] | `square % 2 == 0` |
//! | filter B | [`processing::filter_cube_div3`] | `cube % 3 == 0` |
//! | transform | [`processing::add_score`] | `score = square*0.5 + cube*0.25 + sqrt` |
//! | aggregate | [`processing::aggregate`] | count, sums, averages over `max(1, count)` |
//!
//! Every stage borrows its input and returns a new, order-preserving vector.
//!
//! ## Modules
//!
//! - [`generation`]: record generation, random sources, the sweep workload
//! - [`processing`]: filter/transform/aggregate stages
//! - [`execution`]: the runner, metrics and observer hooks
//! - [`config`]: run configuration
//! - [`logging`]: leveled log sinks
//! - [`types`]: record and summary types
//! - [`error`]: the error type used across the crate

pub mod config;
pub mod error;
pub mod execution;
pub mod generation;
pub mod logging;
pub mod processing;
pub mod types;

pub use error::{PipelineError, PipelineResult};
