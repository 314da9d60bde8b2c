//! Order-preserving filter stages.

use crate::types::Record;

/// Returns a new vector holding the items for which `predicate` returns `true`, in input order.
///
/// The input is only borrowed; retained items are cloned.
pub fn filter<T, F>(records: &[T], mut predicate: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    records.iter().filter(|&r| predicate(r)).cloned().collect()
}

/// First stage: keep records whose square is even.
pub fn filter_even_square(records: &[Record]) -> Vec<Record> {
    filter(records, |r| r.square % 2 == 0)
}

/// Second stage: keep records whose cube is divisible by three.
pub fn filter_cube_div3(records: &[Record]) -> Vec<Record> {
    filter(records, |r| r.cube % 3 == 0)
}

#[cfg(test)]
mod tests {
    use super::{filter, filter_cube_div3, filter_even_square};
    use crate::types::Record;

    fn records(indices: &[i64]) -> Vec<Record> {
        indices
            .iter()
            .map(|&i| Record {
                block_id: 0,
                index: i,
                square: i * i,
                cube: i * i * i,
                sqrt: (i as f64).sqrt(),
                noisy: (i * i) as f64,
            })
            .collect()
    }

    fn indices(recs: &[Record]) -> Vec<i64> {
        recs.iter().map(|r| r.index).collect()
    }

    #[test]
    fn even_square_keeps_even_indices_in_order() {
        let input = records(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let out = filter_even_square(&input);

        assert_eq!(indices(&out), vec![0, 2, 4, 6, 8]);
        assert!(out.iter().all(|r| r.square % 2 == 0));
        assert!(out.iter().all(|r| input.contains(r)));
        // Original unchanged
        assert_eq!(input.len(), 10);
    }

    #[test]
    fn cube_div3_after_even_square() {
        let input = records(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let stage_a = filter_even_square(&input);
        let stage_b = filter_cube_div3(&stage_a);

        assert_eq!(indices(&stage_b), vec![0, 6]);
        assert!(stage_b.iter().all(|r| stage_a.contains(r)));
        assert!(stage_b
            .iter()
            .all(|r| r.square % 2 == 0 && r.cube % 3 == 0));
    }

    #[test]
    fn filters_handle_empty_input() {
        assert!(filter_even_square(&[]).is_empty());
        assert!(filter_cube_div3(&[]).is_empty());
    }

    #[test]
    fn generic_filter_can_return_empty() {
        let input = records(&[1, 2, 3]);
        assert!(filter(&input, |_| false).is_empty());
        assert_eq!(filter(&input, |_| true), input);
    }
}
