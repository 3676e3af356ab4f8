//! Type definitions for the Sales Analytics Service
//!
//! This module contains the data structures used throughout the service:
//! raw and normalized sale records, inventory items, aggregation results,
//! and the composed dashboard report types returned by the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw sale record as it arrives at the service boundary.
///
/// Every field is optional: upstream data is messy and the analytics core
/// is contractually required to produce a best-effort answer for any
/// input. Coercion to a usable shape happens exactly once, in
/// [`SaleRecord::from_input`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecordInput {
    /// Product name; records without one still aggregate, they just
    /// never form a product group.
    pub product_name: Option<String>,
    /// Event timestamp (RFC 3339). Absent or unparsable timestamps
    /// exclude the record from time-bucketed views only.
    pub timestamp: Option<String>,
    /// Unit price.
    pub price: Option<f64>,
    /// Units sold.
    pub quantity: Option<f64>,
    /// Unit cost basis.
    pub net_price: Option<f64>,
    /// Per-unit profit; recomputed from price/net_price when both are present.
    pub profit: Option<f64>,
    /// Stored `price * quantity`; recomputed when the components are present.
    pub total_sales: Option<f64>,
    /// Stored `profit * quantity`; recomputed when the components are present.
    pub total_profit: Option<f64>,
    /// Product category.
    pub category: Option<String>,
    /// Country/region name.
    pub location: Option<String>,
}

/// A normalized sale record, the unit of input for every analytics
/// function in this crate.
///
/// Derived fields are computed once at the boundary (profit =
/// price - net_price, total_sales = price * quantity, total_profit =
/// profit * quantity); the core never re-derives them per call site and
/// never trusts stored values when the components are available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Unique record identifier, assigned at ingest.
    pub id: Uuid,
    /// Product name.
    pub product_name: String,
    /// Event timestamp; `None` when absent or unparsable upstream.
    pub timestamp: Option<DateTime<Utc>>,
    /// Unit price.
    pub price: f64,
    /// Units sold.
    pub quantity: f64,
    /// Unit cost basis.
    pub net_price: f64,
    /// Per-unit profit.
    pub profit: f64,
    /// `price * quantity`.
    pub total_sales: f64,
    /// `profit * quantity`.
    pub total_profit: f64,
    /// Product category.
    pub category: String,
    /// Country/region name.
    pub location: String,
}

impl SaleRecord {
    /// Normalize a raw input record.
    ///
    /// Numeric fields coerce to 0 when absent, timestamps that fail to
    /// parse as RFC 3339 become `None`, and the derived fields are
    /// recomputed from their components. Stored derived values are only
    /// used when the components are missing ("use what's there").
    pub fn from_input(input: SaleRecordInput) -> Self {
        let price = input.price.unwrap_or(0.0);
        let quantity = input.quantity.unwrap_or(0.0);
        let net_price = input.net_price.unwrap_or(0.0);

        let profit = match (input.price, input.net_price) {
            (Some(p), Some(n)) => p - n,
            _ => input.profit.unwrap_or(price - net_price),
        };
        let total_sales = match (input.price, input.quantity) {
            (Some(p), Some(q)) => p * q,
            _ => input.total_sales.unwrap_or(price * quantity),
        };
        let total_profit = match input.quantity {
            Some(q) => profit * q,
            None => input.total_profit.unwrap_or(profit * quantity),
        };

        let timestamp = input
            .timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            id: Uuid::new_v4(),
            product_name: input.product_name.unwrap_or_default(),
            timestamp,
            price,
            quantity,
            net_price,
            profit,
            total_sales,
            total_profit,
            category: input.category.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
        }
    }
}

/// Current stock level for a `(category, product_name)` pair.
///
/// Created on first upsert, mutated by price/stock edits and stock
/// reductions, never deleted in normal flow (stock can reach 0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Product category (first half of the composite key).
    pub category: String,
    /// Product name (second half of the composite key).
    pub product_name: String,
    /// Units in stock.
    pub stock: u64,
    /// Unit price.
    pub price: f64,
    /// Unit cost basis.
    pub net_price: f64,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// A keyed aggregation result: `keys[i]` corresponds to `values[i]`.
///
/// Ephemeral, produced fresh on every request; never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregationResult {
    pub keys: Vec<String>,
    pub values: Vec<f64>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// One bucket of the dynamic price histogram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBucket {
    /// Range label, e.g. `"10K-25K"`.
    pub label: String,
    /// Number of records whose price falls in the bucket.
    pub count: usize,
}

/// Slope and intercept of an ordinary least-squares fit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

/// A forecast continuation of a labeled monthly series.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSeries {
    /// Labels for the extrapolated points, continuing the input labels.
    pub next_labels: Vec<String>,
    /// Extrapolated values, one per label.
    pub forecasts: Vec<f64>,
}

/// Trend slope of a single entity (product, category, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityTrend {
    pub name: String,
    pub slope: f64,
}

/// Entities partitioned into rising and declining trends.
///
/// `rising` holds positive slopes sorted descending, `declining`
/// negative slopes sorted ascending (most negative first); each side is
/// capped at 5 entries. Flat entities appear in neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendPartition {
    pub rising: Vec<EntityTrend>,
    pub declining: Vec<EntityTrend>,
}

/// Price elasticity estimate for one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticityEntry {
    pub group: String,
    /// Slope of ln(quantity) regressed on ln(price); 0 when fewer than
    /// two valid pairs exist.
    pub elasticity: f64,
}

/// Headline dashboard figures computed by the KPI engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiBundle {
    /// Sum of `total_sales` over all records, no time filter.
    pub total_revenue: f64,
    /// Sum of `total_profit` over all records.
    pub total_profit: f64,
    /// Sum of `quantity` over all records.
    pub total_units: f64,
    /// `total_profit / total_revenue` as a percentage.
    pub profit_margin: f64,
    /// Revenue change, last 3 days vs the prior 3 days, in percent.
    pub revenue_change_pct: f64,
    /// Hour of day (0-23) with the highest sales; `None` when no record
    /// carries a usable timestamp.
    pub peak_hour: Option<u32>,
    /// Product with the highest cumulative quantity; "N/A" when there
    /// are no product groups.
    pub best_selling_product: String,
}

/// The combined analytics report served by `GET /analytics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub kpis: KpiBundle,
    /// Revenue summed per category, first-seen order.
    pub revenue_by_category: AggregationResult,
    /// Revenue summed per location, first-seen order.
    pub revenue_by_location: AggregationResult,
    /// Highest-revenue products, descending, capped by configuration.
    pub top_products: AggregationResult,
    /// Revenue share of each category, percent of grand total.
    pub category_revenue_share: AggregationResult,
    /// Monthly revenue series, chronological.
    pub monthly_revenue: AggregationResult,
    /// Linear continuation of the monthly revenue series.
    pub revenue_forecast: ForecastSeries,
    /// Sales summed per hour of day, 24 fixed slots.
    pub hourly_sales: Vec<f64>,
    /// Dynamic price histogram; zero-count buckets omitted.
    pub price_histogram: Vec<PriceBucket>,
    /// Products partitioned by revenue trend slope.
    pub product_trends: TrendPartition,
    /// Price elasticity per category.
    pub price_elasticity: Vec<ElasticityEntry>,
}
