//! Data Transfer Objects for the HTTP API.
//!
//! History payloads reuse the domain types from [`crate::api`], which are
//! already serializable with camelCase field names.

use serde::{Deserialize, Serialize};

pub use crate::api::{AnalysisRecord, HistoryPage, PaginationMeta, ScoringConfig};
use crate::db::repository::PoolStats;

/// API version reported by `/` and `/health`.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response for a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub score: i32,
    /// Always `"ok"`
    pub status: String,
}

impl AnalyzeResponse {
    pub fn ok(score: i32) -> Self {
        Self {
            score,
            status: "ok".to_string(),
        }
    }
}

/// Response for `GET /api/history`.
pub type HistoryResponse = HistoryPage;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected`, or `error` (`error: <message>` in development mode)
    pub database: String,
    /// Duration of the store check in milliseconds
    pub latency_ms: u64,
    /// Connection pool statistics, for pooled backends only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

/// Service descriptor served at `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointMap {
    pub analyze: String,
    pub history: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            message: "Text compliance scoring API".to_string(),
            version: API_VERSION.to_string(),
            endpoints: EndpointMap {
                analyze: "POST /api/analyze".to_string(),
                history: "GET /api/history".to_string(),
            },
        }
    }
}
