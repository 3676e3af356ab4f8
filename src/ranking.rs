//! Extremal-record selection and top-N rankings.

use std::cmp::Ordering;

use crate::types::{AggregationResult, SaleRecord};

/// Find the record maximizing `value_fn` with a single linear scan.
///
/// Comparison is strict greater-than, so ties keep the earliest
/// encountered record. Empty input yields `None`; the KPI layer
/// substitutes its zero-valued "N/A" fallback there.
pub fn max_by<V>(records: &[SaleRecord], value_fn: V) -> Option<&SaleRecord>
where
    V: Fn(&SaleRecord) -> f64,
{
    let mut best: Option<&SaleRecord> = None;
    for record in records {
        match best {
            Some(current) if value_fn(record) > value_fn(current) => best = Some(record),
            None => best = Some(record),
            _ => {}
        }
    }
    best
}

/// The first `n` records sorted descending by `value_fn`.
///
/// The sort is stable: records with equal values retain their input
/// order, keeping the output deterministic. `n` larger than the input
/// returns everything.
pub fn top_n<V>(records: &[SaleRecord], value_fn: V, n: usize) -> Vec<&SaleRecord>
where
    V: Fn(&SaleRecord) -> f64,
{
    let mut sorted: Vec<&SaleRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        value_fn(b)
            .partial_cmp(&value_fn(a))
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// The first `n` entries of an aggregation sorted descending by value.
///
/// Same stable ordering and truncation rules as [`top_n`], applied to
/// already-aggregated key/value pairs.
pub fn top_entries(result: &AggregationResult, n: usize) -> AggregationResult {
    let mut order: Vec<usize> = (0..result.values.len()).collect();
    order.sort_by(|&a, &b| {
        result.values[b]
            .partial_cmp(&result.values[a])
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(n);

    AggregationResult {
        keys: order.iter().map(|&i| result.keys[i].clone()).collect(),
        values: order.iter().map(|&i| result.values[i]).collect(),
    }
}

/// Index of the largest value in an aggregation result, with the same
/// strict-`>` tie policy as [`max_by`].
pub fn argmax(result: &AggregationResult) -> Option<(&str, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in result.values.iter().enumerate() {
        match best {
            Some((_, current)) if *value > current => best = Some((i, *value)),
            None => best = Some((i, *value)),
            _ => {}
        }
    }
    best.map(|(i, value)| (result.keys[i].as_str(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleRecordInput;

    fn record(name: &str, quantity: f64) -> SaleRecord {
        SaleRecord::from_input(SaleRecordInput {
            product_name: Some(name.to_string()),
            quantity: Some(quantity),
            ..Default::default()
        })
    }

    #[test]
    fn test_max_by_empty_input() {
        assert!(max_by(&[], |r| r.quantity).is_none());
    }

    #[test]
    fn test_max_by_ties_keep_earliest() {
        let records = vec![record("first", 5.0), record("second", 5.0)];
        let best = max_by(&records, |r| r.quantity).unwrap();
        assert_eq!(best.product_name, "first");
    }

    #[test]
    fn test_max_by_picks_largest() {
        let records = vec![record("a", 2.0), record("b", 9.0), record("c", 4.0)];
        let best = max_by(&records, |r| r.quantity).unwrap();
        assert_eq!(best.product_name, "b");
    }

    #[test]
    fn test_top_n_is_stable_for_ties() {
        let records = vec![
            record("a", 3.0),
            record("b", 7.0),
            record("c", 3.0),
            record("d", 7.0),
        ];
        let top = top_n(&records, |r| r.quantity, 4);
        let names: Vec<&str> = top.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let records = vec![record("a", 1.0), record("b", 2.0), record("c", 3.0)];
        let top = top_n(&records, |r| r.quantity, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_name, "c");
    }

    #[test]
    fn test_top_n_idempotent_on_sorted_input() {
        let records = vec![record("c", 3.0), record("b", 2.0), record("a", 1.0)];
        let once: Vec<String> = top_n(&records, |r| r.quantity, 3)
            .iter()
            .map(|r| r.product_name.clone())
            .collect();
        assert_eq!(once, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_top_entries_sorts_and_truncates() {
        let result = AggregationResult {
            keys: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            values: vec![3.0, 7.0, 3.0, 9.0],
        };
        let top = top_entries(&result, 3);
        assert_eq!(top.keys, vec!["d", "b", "a"]);
        assert_eq!(top.values, vec![9.0, 7.0, 3.0]);

        let all = top_entries(&result, 10);
        assert_eq!(all.keys.len(), 4);
    }

    #[test]
    fn test_argmax() {
        let result = AggregationResult {
            keys: vec!["x".into(), "y".into(), "z".into()],
            values: vec![1.0, 8.0, 8.0],
        };
        let (key, value) = argmax(&result).unwrap();
        assert_eq!(key, "y");
        assert_eq!(value, 8.0);
        assert!(argmax(&AggregationResult::default()).is_none());
    }
}
