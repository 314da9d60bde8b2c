//! Core data model types for the block pipeline.
//!
//! Records are produced by [`crate::generation`], narrowed and scored by
//! [`crate::processing`], and summarized into one [`BlockResult`] per block by
//! [`crate::execution`].

use std::fmt;

use serde::Serialize;

/// A single generated record for one index within a block.
///
/// Records are immutable once generated; stages that need extra fields produce new values
/// (see [`ScoredRecord`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Block this record belongs to.
    pub block_id: i64,
    /// 0-based position within the block.
    pub index: i64,
    /// `index * index`.
    pub square: i64,
    /// `index * index * index`.
    pub cube: i64,
    /// Square root of `index`.
    pub sqrt: f64,
    /// `square` plus a small bounded random perturbation.
    pub noisy: f64,
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

/// A [`Record`] with the derived score added by the transform stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    /// Copy of the source record's fields.
    #[serde(flatten)]
    pub record: Record,
    /// `square * 0.5 + cube * 0.25 + sqrt`.
    pub score: f64,
}

impl AsRef<Record> for ScoredRecord {
    fn as_ref(&self) -> &Record {
        &self.record
    }
}

/// Aggregate statistics over a block's surviving records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of records that survived both filter stages.
    pub count: usize,
    pub square_sum: i64,
    pub cube_sum: i64,
    /// `square_sum / max(1, count)`.
    pub square_avg: f64,
    /// `cube_sum / max(1, count)`.
    pub cube_avg: f64,
}

impl Summary {
    /// Summary of an empty record set.
    pub const EMPTY: Summary = Summary {
        count: 0,
        square_sum: 0,
        cube_sum: 0,
        square_avg: 0.0,
        cube_avg: 0.0,
    };
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={}, square_sum={}, cube_sum={}, square_avg={:.3}, cube_avg={:.3}",
            self.count, self.square_sum, self.cube_sum, self.square_avg, self.cube_avg
        )
    }
}

/// The outcome of processing one block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockResult {
    pub block_id: i64,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::{Record, ScoredRecord, Summary};

    #[test]
    fn summary_display_is_compact() {
        let s = Summary {
            count: 2,
            square_sum: 36,
            cube_sum: 216,
            square_avg: 18.0,
            cube_avg: 108.0,
        };
        assert_eq!(
            s.to_string(),
            "count=2, square_sum=36, cube_sum=216, square_avg=18.000, cube_avg=108.000"
        );
    }

    #[test]
    fn scored_record_serializes_flat() {
        let scored = ScoredRecord {
            record: Record {
                block_id: 1,
                index: 4,
                square: 16,
                cube: 64,
                sqrt: 2.0,
                noisy: 16.0,
            },
            score: 26.0,
        };
        let v = serde_json::to_value(&scored).unwrap();
        assert_eq!(v["square"], 16);
        assert_eq!(v["cube"], 64);
        assert_eq!(v["score"], 26.0);
        assert!(v.get("record").is_none());
    }
}
