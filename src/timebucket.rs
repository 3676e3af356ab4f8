//! Time-bucketed aggregation: hour-of-day profiles and calendar
//! day/month series.
//!
//! Records without a usable timestamp are skipped entirely; they never
//! land in bucket 0. Day and month results are ordered chronologically
//! (by the underlying date, not by label), because they feed the
//! forecasting path where positional order is the regression axis.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};

use crate::types::{AggregationResult, SaleRecord};

/// Sum `value_fn` into 24 hour-of-day slots.
pub fn by_hour<V>(records: &[SaleRecord], value_fn: V) -> [f64; 24]
where
    V: Fn(&SaleRecord) -> f64,
{
    let mut buckets = [0.0; 24];
    for record in records {
        if let Some(ts) = record.timestamp {
            buckets[ts.hour() as usize] += value_fn(record);
        }
    }
    buckets
}

/// Sum `value_fn` per calendar day, chronological, labeled `YYYY-MM-DD`.
pub fn by_calendar_day<V>(records: &[SaleRecord], value_fn: V) -> AggregationResult
where
    V: Fn(&SaleRecord) -> f64,
{
    let mut buckets: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if let Some(ts) = record.timestamp {
            *buckets.entry(ts.date_naive()).or_insert(0.0) += value_fn(record);
        }
    }

    let mut result = AggregationResult::default();
    for (date, value) in buckets {
        result.keys.push(date.format("%Y-%m-%d").to_string());
        result.values.push(value);
    }
    result
}

/// Sum `value_fn` per calendar month, chronological, labeled
/// `"<Month> <Year>"` (e.g. `"March 2026"`).
pub fn by_month<V>(records: &[SaleRecord], value_fn: V) -> AggregationResult
where
    V: Fn(&SaleRecord) -> f64,
{
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for record in records {
        if let Some(ts) = record.timestamp {
            *buckets.entry((ts.year(), ts.month())).or_insert(0.0) += value_fn(record);
        }
    }

    let mut result = AggregationResult::default();
    for ((year, month), value) in buckets {
        let date = chrono::NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();
        result.keys.push(date.format("%B %Y").to_string());
        result.values.push(value);
    }
    result
}
