//! In-memory record stages.
//!
//! Every stage borrows its input and returns a new vector, preserving order:
//!
//! - [`filter_even_square()`]: keep records with an even square
//! - [`filter_cube_div3()`]: keep records whose cube is divisible by three
//! - [`add_score()`]: attach `square * 0.5 + cube * 0.25 + sqrt`
//! - [`aggregate()`]: reduce to a [`crate::types::Summary`]
//!
//! [`filter()`] and [`map()`] are the generic building blocks the stages are written with.
//!
//! ## Example: generate → filter → filter → score → aggregate
//!
//! ```rust
//! use block_pipeline::generation::{RecordGenerator, SeededRandom};
//! use block_pipeline::processing::{add_score, aggregate, filter_cube_div3, filter_even_square};
//!
//! let records = RecordGenerator::new(SeededRandom::new(42)).generate(0, 10).unwrap();
//!
//! let even = filter_even_square(&records);
//! let div3 = filter_cube_div3(&even);
//! let scored = add_score(&div3);
//!
//! let summary = aggregate(&scored).unwrap();
//! assert_eq!(summary.count, 2);
//! assert_eq!(summary.square_sum, 36);
//! assert_eq!(summary.cube_sum, 216);
//! ```

pub mod filter;
pub mod map;
pub mod reduce;

pub use filter::{filter, filter_cube_div3, filter_even_square};
pub use map::{add_score, map, score};
pub use reduce::aggregate;
