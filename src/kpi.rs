//! Headline KPI computation and dashboard report assembly.
//!
//! Composes the aggregation, time-bucketing, histogram and trend
//! engines into the figures the dashboard renders: totals, profit
//! margin, period-over-period change, peak hour, and the best-selling
//! product by cumulative volume.

use chrono::{DateTime, Duration, Utc};

use crate::{
    aggregate::{group_sum, share_of_total},
    config::AnalyticsConfig,
    histogram::dynamic_price_histogram,
    ranking::{argmax, top_entries},
    timebucket::{by_hour, by_month},
    trend::{entity_trend_slopes, forecast_next, price_elasticity},
    types::{AggregationResult, AnalyticsReport, KpiBundle, SaleRecord},
};

/// Sentinel reported when a maximum has no defined argument
/// (no product groups, no timestamped sales).
pub const NOT_AVAILABLE: &str = "N/A";

/// Percent change between the trailing window `[now - days, now)` and
/// the one before it, `[now - 2*days, now - days)`.
///
/// A zero baseline resolves asymmetrically: +100% when the recent
/// window is positive, -100% when negative, 0 when both are zero. That
/// is a deliberate dashboard convention, not a numerical accident.
pub fn period_change<V>(
    records: &[SaleRecord],
    value_fn: V,
    now: DateTime<Utc>,
    days: i64,
) -> f64
where
    V: Fn(&SaleRecord) -> f64,
{
    let boundary = now - Duration::days(days);
    let start = now - Duration::days(days * 2);

    let mut last = 0.0;
    let mut prev = 0.0;
    for record in records {
        let Some(ts) = record.timestamp else { continue };
        if ts >= boundary && ts < now {
            last += value_fn(record);
        } else if ts >= start && ts < boundary {
            prev += value_fn(record);
        }
    }

    if prev == 0.0 {
        if last > 0.0 {
            100.0
        } else if last < 0.0 {
            -100.0
        } else {
            0.0
        }
    } else {
        ((last - prev) / prev.abs()) * 100.0
    }
}

/// Hour of day with the highest summed sales, or `None` when every
/// hour is zero (no usable timestamps).
pub fn peak_hour(hourly: &[f64; 24]) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (hour, value) in hourly.iter().enumerate() {
        match best {
            Some((_, current)) if *value > current => best = Some((hour as u32, *value)),
            None => best = Some((hour as u32, *value)),
            _ => {}
        }
    }
    best.filter(|(_, value)| *value > 0.0).map(|(hour, _)| hour)
}

/// Compute the headline KPI bundle for a record snapshot.
pub fn compute_kpis(records: &[SaleRecord], now: DateTime<Utc>, cfg: &AnalyticsConfig) -> KpiBundle {
    let total_revenue: f64 = records.iter().map(|r| r.total_sales).sum();
    let total_profit: f64 = records.iter().map(|r| r.total_profit).sum();
    let total_units: f64 = records.iter().map(|r| r.quantity).sum();

    // Rank products by cumulative quantity across records, not by any
    // single record's quantity.
    let per_product = group_sum(records, |r| &r.product_name, |r| r.quantity);
    let best_selling_product = argmax(&per_product)
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    KpiBundle {
        total_revenue,
        total_profit,
        total_units,
        profit_margin: share_of_total(total_profit, total_revenue),
        revenue_change_pct: period_change(records, |r| r.total_sales, now, cfg.period_days),
        peak_hour: peak_hour(&by_hour(records, |r| r.total_sales)),
        best_selling_product,
    }
}

/// Assemble the full dashboard report from a record snapshot.
pub fn build_report(
    records: &[SaleRecord],
    now: DateTime<Utc>,
    cfg: &AnalyticsConfig,
) -> AnalyticsReport {
    let revenue_by_category = group_sum(records, |r| &r.category, |r| r.total_sales);
    let revenue_by_location = group_sum(records, |r| &r.location, |r| r.total_sales);

    let grand_total: f64 = revenue_by_category.values.iter().sum();
    let category_revenue_share = AggregationResult {
        keys: revenue_by_category.keys.clone(),
        values: revenue_by_category
            .values
            .iter()
            .map(|v| share_of_total(*v, grand_total))
            .collect(),
    };

    let monthly_revenue = by_month(records, |r| r.total_sales);
    let revenue_forecast = forecast_next(
        &monthly_revenue.keys,
        &monthly_revenue.values,
        cfg.forecast_steps,
    );

    let product_revenue = group_sum(records, |r| &r.product_name, |r| r.total_sales);

    AnalyticsReport {
        kpis: compute_kpis(records, now, cfg),
        revenue_by_category,
        revenue_by_location,
        top_products: top_entries(&product_revenue, cfg.top_n),
        category_revenue_share,
        monthly_revenue,
        revenue_forecast,
        hourly_sales: by_hour(records, |r| r.total_sales).to_vec(),
        price_histogram: dynamic_price_histogram(records),
        product_trends: entity_trend_slopes(records, |r| &r.product_name, |r| r.total_sales),
        price_elasticity: price_elasticity(records, |r| &r.category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleRecordInput;
    use pretty_assertions::assert_eq;

    fn record(timestamp: Option<&str>, total_sales: f64) -> SaleRecord {
        SaleRecord::from_input(SaleRecordInput {
            product_name: Some("p".to_string()),
            category: Some("c".to_string()),
            location: Some("l".to_string()),
            timestamp: timestamp.map(|s| s.to_string()),
            total_sales: Some(total_sales),
            ..Default::default()
        })
    }

    fn now() -> DateTime<Utc> {
        "2026-03-10T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_period_change_regular() {
        let records = vec![
            record(Some("2026-03-09T12:00:00Z"), 50.0),  // last window
            record(Some("2026-03-05T12:00:00Z"), 100.0), // prior window
        ];
        let change = period_change(&records, |r| r.total_sales, now(), 3);
        assert_eq!(change, -50.0);
    }

    #[test]
    fn test_period_change_zero_baseline() {
        let last_only = vec![record(Some("2026-03-09T12:00:00Z"), 150.0)];
        assert_eq!(period_change(&last_only, |r| r.total_sales, now(), 3), 100.0);

        let nothing: Vec<SaleRecord> = Vec::new();
        assert_eq!(period_change(&nothing, |r| r.total_sales, now(), 3), 0.0);

        let negative = vec![record(Some("2026-03-09T12:00:00Z"), -25.0)];
        assert_eq!(period_change(&negative, |r| r.total_sales, now(), 3), -100.0);
    }

    #[test]
    fn test_period_change_excludes_out_of_window_records() {
        let records = vec![
            record(Some("2026-03-09T12:00:00Z"), 10.0),
            record(Some("2026-01-01T12:00:00Z"), 9999.0), // far past
            record(None, 9999.0),                         // no timestamp
        ];
        assert_eq!(period_change(&records, |r| r.total_sales, now(), 3), 100.0);
    }

    #[test]
    fn test_peak_hour() {
        let mut hourly = [0.0; 24];
        hourly[14] = 10.0;
        hourly[9] = 3.0;
        assert_eq!(peak_hour(&hourly), Some(14));
        assert_eq!(peak_hour(&[0.0; 24]), None);
    }

    #[test]
    fn test_best_seller_uses_cumulative_quantity() {
        let make = |name: &str, quantity: f64| {
            SaleRecord::from_input(SaleRecordInput {
                product_name: Some(name.to_string()),
                quantity: Some(quantity),
                ..Default::default()
            })
        };
        // "a" has the single biggest record, "b" the biggest cumulative volume
        let records = vec![make("a", 10.0), make("b", 6.0), make("b", 6.0)];
        let kpis = compute_kpis(&records, now(), &AnalyticsConfig::default());
        assert_eq!(kpis.best_selling_product, "b");
        assert_eq!(kpis.total_units, 22.0);
    }

    #[test]
    fn test_kpis_on_empty_input() {
        let kpis = compute_kpis(&[], now(), &AnalyticsConfig::default());
        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.profit_margin, 0.0);
        assert_eq!(kpis.peak_hour, None);
        assert_eq!(kpis.best_selling_product, NOT_AVAILABLE);
    }

    #[test]
    fn test_report_category_share_sums_to_hundred() {
        let records = vec![record(None, 300.0), record(None, 100.0)];
        let report = build_report(&records, now(), &AnalyticsConfig::default());
        let share_sum: f64 = report.category_revenue_share.values.iter().sum();
        assert!((share_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_top_products_respects_configured_cap() {
        let make = |name: &str, total_sales: f64| {
            SaleRecord::from_input(SaleRecordInput {
                product_name: Some(name.to_string()),
                total_sales: Some(total_sales),
                ..Default::default()
            })
        };
        let records = vec![make("small", 10.0), make("big", 500.0), make("mid", 50.0)];

        let cfg = AnalyticsConfig {
            top_n: 2,
            ..Default::default()
        };
        let report = build_report(&records, now(), &cfg);
        assert_eq!(report.top_products.keys, vec!["big", "mid"]);
        assert_eq!(report.top_products.values, vec![500.0, 50.0]);
    }

    #[test]
    fn test_report_empty_input_is_well_defined() {
        let report = build_report(&[], now(), &AnalyticsConfig::default());
        assert!(report.revenue_by_category.is_empty());
        assert!(report.price_histogram.is_empty());
        assert_eq!(report.hourly_sales, vec![0.0; 24]);
        assert_eq!(report.revenue_forecast.forecasts, vec![0.0; 3]);
    }
}
