//! Grouping and reduction over sale records.
//!
//! All functions here are pure: they read a record snapshot and produce
//! a fresh [`AggregationResult`]. Group order is first-seen order of the
//! key values, never sorted; the chronological bucketers in
//! [`crate::timebucket`] are the one deliberate exception to that rule.

use std::collections::HashMap;

use crate::types::{AggregationResult, SaleRecord};

/// Partition `records` by `key_fn` and sum `value_fn` per group.
///
/// Records whose key is empty are ignored entirely. Empty input (or
/// input where every key is empty) yields an empty result.
pub fn group_sum<K, V>(records: &[SaleRecord], key_fn: K, value_fn: V) -> AggregationResult
where
    K: Fn(&SaleRecord) -> &str,
    V: Fn(&SaleRecord) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut result = AggregationResult::default();

    for record in records {
        let key = key_fn(record);
        if key.is_empty() {
            continue;
        }
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            result.keys.push(key.to_string());
            result.values.push(0.0);
            result.values.len() - 1
        });
        result.values[slot] += value_fn(record);
    }

    result
}

/// Partition `records` by `key_fn` and average `value_fn` per group.
///
/// The divisor is the number of records that passed the key filter for
/// that group. An empty group yields 0: unreachable in practice, since
/// a group only exists once a record lands in it, but the guard keeps
/// the division total.
pub fn group_average<K, V>(records: &[SaleRecord], key_fn: K, value_fn: V) -> AggregationResult
where
    K: Fn(&SaleRecord) -> &str,
    V: Fn(&SaleRecord) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<f64> = Vec::new();
    let mut result = AggregationResult::default();

    for record in records {
        let key = key_fn(record);
        if key.is_empty() {
            continue;
        }
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            result.keys.push(key.to_string());
            result.values.push(0.0);
            counts.push(0.0);
            result.values.len() - 1
        });
        result.values[slot] += value_fn(record);
        counts[slot] += 1.0;
    }

    for (value, count) in result.values.iter_mut().zip(&counts) {
        *value = if *count > 0.0 { *value / count } else { 0.0 };
    }

    result
}

/// Express `value` as a percentage of `total`; 0 when `total` is not
/// positive, never NaN.
pub fn share_of_total(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        (value / total) * 100.0
    } else {
        0.0
    }
}
