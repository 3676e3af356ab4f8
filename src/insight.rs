//! Compact data summaries for the external insight generator, and the
//! deterministic fallback text used when that service is absent.
//!
//! The generator itself is an optional external collaborator; the
//! fallback path is part of the core contract and must always succeed
//! without network access.

use serde::{Deserialize, Serialize};

use crate::{
    kpi::NOT_AVAILABLE,
    ranking::argmax,
    types::{AggregationResult, AnalyticsReport},
};

/// A capped series summary handed to the external text generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompactSummary {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Build a compact summary of an aggregation, keeping at most `cap`
/// leading entries. Min/max/average cover the capped subset.
pub fn compact_summary(result: &AggregationResult, cap: usize) -> CompactSummary {
    let take = result.values.len().min(cap);
    let labels = result.keys[..take].to_vec();
    let values = result.values[..take].to_vec();

    if values.is_empty() {
        return CompactSummary::default();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let average = values.iter().sum::<f64>() / values.len() as f64;

    CompactSummary {
        labels,
        values,
        min,
        max,
        average,
    }
}

/// The KPI templates a fallback sentence can be generated for.
///
/// Each variant binds to a formatter over the computed report, so a
/// valid summary sentence always exists without matching on chart
/// title strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    RevenueOverTime,
    ProfitMargin,
    TopCategory,
    SalesByLocation,
    PriceDistribution,
}

/// What the insight endpoint returns: the fallback sentence plus the
/// capped series the external generator would receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightPayload {
    pub kind: InsightKind,
    pub summary: String,
    pub series: CompactSummary,
}

impl InsightKind {
    /// The aggregation backing this template's chart.
    ///
    /// The histogram variant has no stored aggregation; its buckets
    /// are converted to label/count pairs on the fly.
    pub fn backing_series(&self, report: &AnalyticsReport) -> AggregationResult {
        match self {
            Self::RevenueOverTime | Self::ProfitMargin => report.monthly_revenue.clone(),
            Self::TopCategory => report.revenue_by_category.clone(),
            Self::SalesByLocation => report.revenue_by_location.clone(),
            Self::PriceDistribution => AggregationResult {
                keys: report
                    .price_histogram
                    .iter()
                    .map(|b| b.label.clone())
                    .collect(),
                values: report
                    .price_histogram
                    .iter()
                    .map(|b| b.count as f64)
                    .collect(),
            },
        }
    }

    /// Render the deterministic fallback sentence for this template.
    pub fn fallback_sentence(&self, report: &AnalyticsReport) -> String {
        match self {
            Self::RevenueOverTime => {
                let months = report.monthly_revenue.keys.len();
                format!(
                    "Total revenue is {:.2} across {} recorded month{}, with a {:+.1}% change over the last period.",
                    report.kpis.total_revenue,
                    months,
                    if months == 1 { "" } else { "s" },
                    report.kpis.revenue_change_pct,
                )
            }
            Self::ProfitMargin => format!(
                "Overall profit margin is {:.1}% on {:.2} in revenue, for {:.2} total profit.",
                report.kpis.profit_margin, report.kpis.total_revenue, report.kpis.total_profit,
            ),
            Self::TopCategory => match argmax(&report.revenue_by_category) {
                Some((name, value)) => format!(
                    "The leading category is {} with {:.2} in revenue; the best-selling product overall is {}.",
                    name, value, report.kpis.best_selling_product,
                ),
                None => format!(
                    "No category data is available yet; the best-selling product is {}.",
                    NOT_AVAILABLE,
                ),
            },
            Self::SalesByLocation => match argmax(&report.revenue_by_location) {
                Some((name, value)) => format!(
                    "Sales span {} location{}; {} leads with {:.2} in revenue.",
                    report.revenue_by_location.keys.len(),
                    if report.revenue_by_location.keys.len() == 1 { "" } else { "s" },
                    name,
                    value,
                ),
                None => "No location data is available yet.".to_string(),
            },
            Self::PriceDistribution => {
                let peak = match report.kpis.peak_hour {
                    Some(hour) => format!("{:02}:00", hour),
                    None => NOT_AVAILABLE.to_string(),
                };
                format!(
                    "Prices spread over {} bucket{}; peak sales hour is {}.",
                    report.price_histogram.len(),
                    if report.price_histogram.len() == 1 { "" } else { "s" },
                    peak,
                )
            }
        }
    }
}
