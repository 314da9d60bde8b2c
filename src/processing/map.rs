//! Record transforms.

use crate::types::{Record, ScoredRecord};

/// Returns a new vector by applying `mapper` to every item, in input order.
pub fn map<T, U, F>(records: &[T], mapper: F) -> Vec<U>
where
    F: FnMut(&T) -> U,
{
    records.iter().map(mapper).collect()
}

/// `square * 0.5 + cube * 0.25 + sqrt`.
pub fn score(record: &Record) -> f64 {
    record.square as f64 * 0.5 + record.cube as f64 * 0.25 + record.sqrt
}

/// Transform stage: attach a [`score`] to each record.
///
/// Inputs are borrowed, never mutated; each output carries a copy of its source record.
pub fn add_score(records: &[Record]) -> Vec<ScoredRecord> {
    map(records, |r| ScoredRecord {
        record: r.clone(),
        score: score(r),
    })
}

#[cfg(test)]
mod tests {
    use super::{add_score, map};
    use crate::types::Record;

    fn record(i: i64) -> Record {
        Record {
            block_id: 2,
            index: i,
            square: i * i,
            cube: i * i * i,
            sqrt: (i as f64).sqrt(),
            noisy: (i * i) as f64 + 0.003,
        }
    }

    #[test]
    fn score_for_index_four() {
        let input = vec![record(4)];
        let out = add_score(&input);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, 26.0);
        assert_eq!(out[0].record, input[0]);
    }

    #[test]
    fn add_score_preserves_fields_and_leaves_input_untouched() {
        let input: Vec<Record> = (0..6).map(record).collect();
        let snapshot = input.clone();
        let out = add_score(&input);

        assert_eq!(input, snapshot);
        for (scored, original) in out.iter().zip(&input) {
            assert_eq!(&scored.record, original);
            assert_eq!(
                scored.score,
                original.square as f64 * 0.5 + original.cube as f64 * 0.25 + original.sqrt
            );
        }
    }

    #[test]
    fn map_preserves_order() {
        let input = [3, 1, 2];
        assert_eq!(map(&input, |v| v * 10), vec![30, 10, 20]);
    }
}
