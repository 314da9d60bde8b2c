use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by pipeline functions.
///
/// This is a single error enum shared across generation, aggregation, configuration and
/// execution. Any error aborts the run it occurs in; nothing is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A count parameter (block count, block size, ...) was negative.
    #[error("{name} must be >= 0 (got {value})")]
    NegativeParameter { name: &'static str, value: i64 },

    /// Integer arithmetic overflowed `i64`.
    #[error("arithmetic overflow computing {quantity} at index {index}")]
    Overflow { quantity: &'static str, index: i64 },

    /// The configuration is structurally valid but unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The worker pool for parallel execution could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A JSON configuration document could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl PipelineError {
    /// Returns `Ok(value)` if `value >= 0`, otherwise [`PipelineError::NegativeParameter`].
    pub(crate) fn non_negative(name: &'static str, value: i64) -> PipelineResult<i64> {
        if value < 0 {
            Err(Self::NegativeParameter { name, value })
        } else {
            Ok(value)
        }
    }
}
