//! HTTP surface for the Sales Analytics Service.
//!
//! A thin axum layer over the analytics core: health probes, record
//! ingestion, inventory reads, and the combined analytics report. The
//! core stays pure; every request recomputes from a fresh store
//! snapshot.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    error::{AnalyticsError, Result},
    insight::{InsightKind, InsightPayload},
    types::{AnalyticsReport, InventoryItem, SaleRecordInput},
    AnalyticsService,
};

/// HTTP server wrapping an [`AnalyticsService`].
pub struct AnalyticsServer {
    service: Arc<AnalyticsService>,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub timestamp: i64,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
        })
    }
}

impl ApiError {
    fn new(error: impl Into<String>, error_code: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            error: error.into(),
            error_code: error_code.into(),
            timestamp: chrono::Utc::now().timestamp(),
        })
    }
}

/// Record ingestion request
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub records: Vec<SaleRecordInput>,
}

/// Record ingestion response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ingested: usize,
    pub total_records: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub record_count: usize,
}


impl AnalyticsServer {
    /// Create a new server for the given service.
    pub fn new(service: AnalyticsService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Start the HTTP server and serve until the task is cancelled.
    pub async fn start(&self) -> Result<()> {
        let app = self.create_router();

        let config = self.service.config();
        let addr = format!("{}:{}", config.server.host, config.server.port);
        info!("Starting Sales Analytics HTTP server on {}", addr);

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            AnalyticsError::internal(format!("Failed to bind to address {}: {}", addr, e))
        })?;

        axum::serve(listener, app)
            .await
            .map_err(|e| AnalyticsError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Create the application router.
    pub fn create_router(&self) -> Router {
        let config = self.service.config();

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .into_inner();

        Router::new()
            // Health endpoints
            .route("/health", get(health_check))
            .route("/health/live", get(liveness_check))
            // Analytics endpoints
            .route("/analytics", get(get_analytics))
            .route("/analytics/insight/:kind", get(get_insight))
            // Data endpoints
            .route("/records", post(ingest_records))
            .route("/inventory", get(get_inventory))
            .layer(middleware)
            .with_state(self.service.clone())
    }
}

/// Health check endpoint
async fn health_check(
    State(service): State<Arc<AnalyticsService>>,
) -> Json<ApiResponse<HealthResponse>> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        record_count: service.record_count().await,
    };
    ApiResponse::ok(response, "Service is healthy")
}

/// Liveness check endpoint
async fn liveness_check() -> Json<ApiResponse<String>> {
    ApiResponse::ok("alive".to_string(), "Service is alive")
}

/// Combined analytics report endpoint
async fn get_analytics(
    State(service): State<Arc<AnalyticsService>>,
) -> std::result::Result<Json<ApiResponse<AnalyticsReport>>, (StatusCode, Json<ApiError>)> {
    match service.report().await {
        Ok(report) => Ok(ApiResponse::ok(report, "Analytics computed successfully")),
        Err(e) => {
            error!("Failed to compute analytics: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(e.to_string(), "ANALYTICS_ERROR"),
            ))
        }
    }
}

/// Insight fallback sentence endpoint
async fn get_insight(
    State(service): State<Arc<AnalyticsService>>,
    Path(kind): Path<String>,
) -> std::result::Result<Json<ApiResponse<InsightPayload>>, (StatusCode, Json<ApiError>)> {
    let kind: InsightKind = match serde_json::from_value(serde_json::Value::String(kind.clone())) {
        Ok(kind) => kind,
        Err(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    format!("Unknown insight kind: {}", kind),
                    "UNKNOWN_INSIGHT_KIND",
                ),
            ));
        }
    };

    match service.insight(kind).await {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Insight generated successfully")),
        Err(e) => {
            error!("Failed to generate insight: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(e.to_string(), "INSIGHT_ERROR"),
            ))
        }
    }
}

/// Record ingestion endpoint
async fn ingest_records(
    State(service): State<Arc<AnalyticsService>>,
    Json(request): Json<IngestRequest>,
) -> Json<ApiResponse<IngestResponse>> {
    let ingested = service.ingest(request.records).await;
    let total_records = service.record_count().await;
    ApiResponse::ok(
        IngestResponse {
            ingested,
            total_records,
        },
        format!("Ingested {} records", ingested),
    )
}

/// Inventory listing endpoint
async fn get_inventory(
    State(service): State<Arc<AnalyticsService>>,
) -> std::result::Result<Json<ApiResponse<Vec<InventoryItem>>>, (StatusCode, Json<ApiError>)> {
    match service.inventory().await {
        Ok(items) => Ok(ApiResponse::ok(items, "Inventory retrieved successfully")),
        Err(e) => {
            error!("Failed to fetch inventory: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(e.to_string(), "INVENTORY_ERROR"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum_test::TestServer;
    use serde_json::json;

    fn test_server() -> TestServer {
        let service = AnalyticsService::new(Config::default());
        let server = AnalyticsServer::new(service);
        TestServer::new(server.create_router()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server();
        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_liveness_check() {
        let server = test_server();
        let response = server.get("/health/live").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analytics_on_empty_store() {
        let server = test_server();
        let response = server.get("/analytics").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["kpis"]["totalRevenue"], json!(0.0));
        assert_eq!(body["data"]["kpis"]["bestSellingProduct"], json!("N/A"));
    }

    #[tokio::test]
    async fn test_ingest_then_analytics() {
        let server = test_server();
        let response = server
            .post("/records")
            .json(&json!({
                "records": [
                    {"productName": "Widget", "category": "Gadgets",
                     "price": 100.0, "quantity": 2.0, "netPrice": 80.0,
                     "location": "Norway"}
                ]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let analytics = server.get("/analytics").await;
        let body: serde_json::Value = analytics.json();
        assert_eq!(body["data"]["kpis"]["totalRevenue"], json!(200.0));
    }

    #[tokio::test]
    async fn test_unknown_insight_kind_is_rejected() {
        let server = test_server();
        let response = server.get("/analytics/insight/nonsense").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_insight_fallback_renders() {
        let server = test_server();
        let response = server.get("/analytics/insight/profit_margin").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: serde_json::Value = response.json();
        assert!(body["data"]["summary"].as_str().unwrap().contains("margin"));
        assert!(body["data"]["series"]["labels"].is_array());
    }
}
