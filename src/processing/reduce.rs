//! Per-block aggregation.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Record, Summary};

/// Reduce records into a [`Summary`].
///
/// - `count` is the number of records.
/// - Sums use checked `i64` addition; overflow returns [`PipelineError::Overflow`].
/// - Averages divide by `max(1, count)`, so an empty input yields all-zero statistics.
pub fn aggregate<R: AsRef<Record>>(records: &[R]) -> PipelineResult<Summary> {
    let count = records.len();
    let square_sum = checked_sum(records, "square_sum", |r| r.square)?;
    let cube_sum = checked_sum(records, "cube_sum", |r| r.cube)?;
    let divisor = count.max(1) as f64;

    Ok(Summary {
        count,
        square_sum,
        cube_sum,
        square_avg: square_sum as f64 / divisor,
        cube_avg: cube_sum as f64 / divisor,
    })
}

fn checked_sum<R, F>(records: &[R], quantity: &'static str, field: F) -> PipelineResult<i64>
where
    R: AsRef<Record>,
    F: Fn(&Record) -> i64,
{
    let mut acc: i64 = 0;
    for r in records {
        let r = r.as_ref();
        acc = acc
            .checked_add(field(r))
            .ok_or(PipelineError::Overflow {
                quantity,
                index: r.index,
            })?;
    }
    Ok(acc)
}
