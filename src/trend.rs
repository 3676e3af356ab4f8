//! Linear-regression trend analysis and forecasting.
//!
//! Ordinary least squares in closed form, applied three ways: raw
//! slope/intercept fits, N-step-ahead extrapolation of the monthly
//! revenue series, and per-entity trend-slope rankings. Degenerate
//! input never errors; it collapses to a flat fit.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::types::{ElasticityEntry, EntityTrend, ForecastSeries, Regression, SaleRecord};

/// Closed-form ordinary least squares over paired observations.
///
/// Fewer than two points yields slope 0 with the last observed value
/// (or 0) as intercept; a zero-variance x axis yields slope 0 with the
/// mean of y as intercept.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Regression {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Regression {
            slope: 0.0,
            intercept: ys.last().copied().unwrap_or(0.0),
        };
    }

    let xs = &xs[..n];
    let ys = &ys[..n];
    let count = n as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();

    let denominator = count * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return Regression {
            slope: 0.0,
            intercept: sum_y / count,
        };
    }

    let slope = (count * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / count;
    Regression { slope, intercept }
}

/// Extrapolate a labeled monthly series `k` steps past its end.
///
/// Values regress against positional index 0..n-1. Labels continue the
/// `"<Month> <Year>"` format of the input by advancing the last label
/// one calendar month per step; when that label does not parse, the
/// forecast falls back to positional `"+k"` labels so the output stays
/// deterministic.
pub fn forecast_next(labels: &[String], values: &[f64], k: usize) -> ForecastSeries {
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let fit = linear_regression(&xs, values);

    let mut series = ForecastSeries::default();
    let mut cursor = labels.last().and_then(|label| parse_month_label(label));

    for step in 1..=k {
        let x = (values.len() + step - 1) as f64;
        series.forecasts.push(fit.slope * x + fit.intercept);

        cursor = cursor.map(next_month);
        let label = match cursor {
            Some(date) => date.format("%B %Y").to_string(),
            None => format!("+{}", step),
        };
        series.next_labels.push(label);
    }

    series
}

fn parse_month_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", label), "%d %B %Y").ok()
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Per-entity trend slopes, partitioned into rising and declining.
///
/// For every distinct entity, the metric values are ordered
/// chronologically and regressed against positional index. Slopes
/// above 0 rank descending into `rising`, below 0 ascending into
/// `declining`; each side keeps its top 5. Entities with fewer than two
/// timestamped points regress flat and appear in neither list.
pub fn entity_trend_slopes<E, M>(
    records: &[SaleRecord],
    entity_fn: E,
    metric_fn: M,
) -> crate::types::TrendPartition
where
    E: Fn(&SaleRecord) -> &str,
    M: Fn(&SaleRecord) -> f64,
{
    let mut order: Vec<String> = Vec::new();
    let mut series: HashMap<String, Vec<(chrono::DateTime<chrono::Utc>, f64)>> = HashMap::new();

    for record in records {
        let entity = entity_fn(record);
        if entity.is_empty() {
            continue;
        }
        let Some(ts) = record.timestamp else { continue };
        series
            .entry(entity.to_string())
            .or_insert_with(|| {
                order.push(entity.to_string());
                Vec::new()
            })
            .push((ts, metric_fn(record)));
    }

    let mut partition = crate::types::TrendPartition::default();
    for name in order {
        let Some(points) = series.get_mut(&name) else { continue };
        points.sort_by_key(|(ts, _)| *ts);
        let xs: Vec<f64> = (0..points.len()).map(|i| i as f64).collect();
        let ys: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        let slope = linear_regression(&xs, &ys).slope;

        if slope > 0.0 {
            partition.rising.push(EntityTrend { name, slope });
        } else if slope < 0.0 {
            partition.declining.push(EntityTrend { name, slope });
        }
    }

    partition
        .rising
        .sort_by(|a, b| b.slope.partial_cmp(&a.slope).unwrap_or(std::cmp::Ordering::Equal));
    partition
        .declining
        .sort_by(|a, b| a.slope.partial_cmp(&b.slope).unwrap_or(std::cmp::Ordering::Equal));
    partition.rising.truncate(5);
    partition.declining.truncate(5);
    partition
}

/// Log-log price elasticity of demand per group.
///
/// For each group, `(ln(price), ln(quantity))` pairs where both are
/// positive regress into a slope; groups with fewer than two valid
/// pairs report elasticity 0.
pub fn price_elasticity<G>(records: &[SaleRecord], group_fn: G) -> Vec<ElasticityEntry>
where
    G: Fn(&SaleRecord) -> &str,
{
    let mut order: Vec<String> = Vec::new();
    let mut pairs: HashMap<String, (Vec<f64>, Vec<f64>)> = HashMap::new();

    for record in records {
        let group = group_fn(record);
        if group.is_empty() {
            continue;
        }
        let entry = pairs.entry(group.to_string()).or_insert_with(|| {
            order.push(group.to_string());
            (Vec::new(), Vec::new())
        });
        if record.price > 0.0 && record.quantity > 0.0 {
            entry.0.push(record.price.ln());
            entry.1.push(record.quantity.ln());
        }
    }

    order
        .into_iter()
        .map(|group| {
            let (xs, ys) = &pairs[&group];
            let elasticity = if xs.len() < 2 {
                0.0
            } else {
                linear_regression(xs, ys).slope
            };
            ElasticityEntry { group, elasticity }
        })
        .collect()
}
