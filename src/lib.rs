//! # Sales Analytics Service
//!
//! A small-business dashboard backend: sale records and per-SKU
//! inventory counts behind a REST API, with an analytics core that
//! turns a flat record snapshot into grouped summaries, rankings,
//! time-bucketed series, histograms, regression forecasts, and
//! headline KPIs.
//!
//! ## Design
//!
//! The analytics core ([`aggregate`], [`ranking`], [`timebucket`],
//! [`histogram`], [`trend`], [`kpi`]) is pure and synchronous: every
//! function reads an in-memory snapshot of [`types::SaleRecord`]s and
//! produces a fresh result, with no caching and no shared mutable
//! state. Malformed input never raises: numeric fields coerce to 0 at
//! the boundary and records without usable timestamps are simply
//! excluded from time-bucketed views.
//!
//! I/O lives at the edges: [`store`] is the record-store seam and
//! [`server`] the axum HTTP surface.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sales_analytics_service::{AnalyticsService, Config, server::AnalyticsServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let service = AnalyticsService::new(config);
//!     AnalyticsServer::new(service).start().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod aggregate;
pub mod config;
pub mod error;
pub mod histogram;
pub mod insight;
pub mod kpi;
pub mod ranking;
pub mod server;
pub mod store;
pub mod timebucket;
pub mod trend;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{AnalyticsError, Result};
pub use server::AnalyticsServer;
pub use store::{InMemoryRecordStore, RecordStore};
pub use types::*;

/// Orchestrates the record store and the pure analytics core.
#[derive(Clone)]
pub struct AnalyticsService {
    config: Arc<Config>,
    store: Arc<InMemoryRecordStore>,
}

impl AnalyticsService {
    /// Create a new service instance with an empty in-memory store.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(InMemoryRecordStore::new()),
        }
    }

    /// Get the service configuration.
    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Get the underlying record store.
    pub fn store(&self) -> Arc<InMemoryRecordStore> {
        self.store.clone()
    }

    /// Normalize and append raw sale records; returns how many were
    /// accepted (all of them; malformed fields coerce, never reject).
    pub async fn ingest(&self, inputs: Vec<SaleRecordInput>) -> usize {
        let records: Vec<SaleRecord> = inputs.into_iter().map(SaleRecord::from_input).collect();
        let count = records.len();
        self.store.insert_records(records).await;
        tracing::debug!(count, "ingested sale records");
        count
    }

    /// Number of stored sale records.
    pub async fn record_count(&self) -> usize {
        self.store.record_count().await
    }

    /// Compute the full dashboard report from a fresh snapshot.
    pub async fn report(&self) -> Result<AnalyticsReport> {
        let records = self.store.fetch_all_sale_records().await?;
        Ok(kpi::build_report(
            &records,
            chrono::Utc::now(),
            &self.config.analytics,
        ))
    }

    /// Render the insight payload for `kind`: the deterministic
    /// fallback sentence plus the capped series a text generator
    /// would receive.
    pub async fn insight(&self, kind: insight::InsightKind) -> Result<insight::InsightPayload> {
        let report = self.report().await?;
        let series = insight::compact_summary(
            &kind.backing_series(&report),
            self.config.analytics.insight_cap,
        );
        Ok(insight::InsightPayload {
            kind,
            summary: kind.fallback_sentence(&report),
            series,
        })
    }

    /// Current inventory snapshot.
    pub async fn inventory(&self) -> Result<Vec<InventoryItem>> {
        self.store.fetch_all_inventory().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_ingest_and_report() {
        let service = AnalyticsService::new(Config::default());
        let ingested = service
            .ingest(vec![SaleRecordInput {
                product_name: Some("Widget".to_string()),
                category: Some("Gadgets".to_string()),
                price: Some(100.0),
                quantity: Some(2.0),
                net_price: Some(80.0),
                ..Default::default()
            }])
            .await;

        assert_eq!(ingested, 1);
        let report = service.report().await.unwrap();
        assert_eq!(report.kpis.total_revenue, 200.0);
        assert_eq!(report.kpis.total_profit, 40.0);
        assert_eq!(report.kpis.best_selling_product, "Widget");
    }

    #[tokio::test]
    async fn test_insight_series_honors_configured_cap() {
        let mut config = Config::default();
        config.analytics.insight_cap = 1;
        let service = AnalyticsService::new(config);

        let record = |month: &str| SaleRecordInput {
            product_name: Some("Widget".to_string()),
            timestamp: Some(format!("2026-{}-15T10:00:00Z", month)),
            total_sales: Some(100.0),
            ..Default::default()
        };
        service.ingest(vec![record("01"), record("02"), record("03")]).await;

        let payload = service
            .insight(insight::InsightKind::RevenueOverTime)
            .await
            .unwrap();
        assert_eq!(payload.series.labels, vec!["January 2026"]);
        assert_eq!(payload.series.values, vec![100.0]);
        assert!(payload.summary.contains("3 recorded months"));
    }

    #[tokio::test]
    async fn test_empty_service_report_is_zeroed() {
        let service = AnalyticsService::new(Config::default());
        let report = service.report().await.unwrap();
        assert_eq!(report.kpis.total_revenue, 0.0);
        assert!(report.revenue_by_category.is_empty());
    }
}
