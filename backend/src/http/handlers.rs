//! HTTP handlers for the REST API.
//!
//! Each handler validates its input at the boundary and delegates to the
//! scoring engine and the store service layer.

use axum::{
    extract::{
        rejection::QueryRejection, FromRequest, OriginalUri, Path, Query, Request, State,
    },
    http::header,
    Form, Json,
};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

use super::dto::{AnalyzeResponse, HealthResponse, HistoryResponse, ServiceInfo, API_VERSION};
use super::error::AppError;
use super::state::AppState;
use crate::api::{AnalysisId, AnalysisRecord, ScoringConfig};
use crate::db::services as db_services;
use crate::services::validation::{
    validate_analyze_request, validate_pagination, HistoryQuery, ValidationErrors,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// =============================================================================
// Service info
// =============================================================================

/// GET /
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// GET /health
///
/// Reports whether the history store is reachable, how long the check took
/// and, for pooled backends, the pool statistics. Always 200. The store's
/// error message is only included in development mode.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let start = Instant::now();
    let result = db_services::health_check(state.repository.as_ref()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let db_status = match result {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => match state.fault_details(e) {
            Some(details) => format!("error: {}", details),
            None => "error".to_string(),
        },
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: API_VERSION.to_string(),
        database: db_status,
        latency_ms,
        pool: state.repository.pool_stats(),
    }))
}

// =============================================================================
// Analysis
// =============================================================================

/// POST /api/analyze
///
/// Scores the submitted text and records it. The body may be JSON or
/// `application/x-www-form-urlencoded`. Nothing is stored when validation
/// fails, and a store fault yields a 500 without a record.
pub async fn analyze(
    State(state): State<AppState>,
    request: Request,
) -> HandlerResult<AnalyzeResponse> {
    let body = read_analyze_body(request).await?;
    let request = validate_analyze_request(&body)?;

    let score = state.engine.score(&request.text);
    db_services::record_analysis(state.repository.as_ref(), &request.text, score)
        .await
        .map_err(|e| state.server_fault(e))?;

    Ok(Json(AnalyzeResponse::ok(score)))
}

/// Decode an analyze body into JSON. Form fields become string values, so
/// both encodings go through the same validation.
async fn read_analyze_body(request: Request) -> Result<Value, ValidationErrors> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

    if is_form {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|rejection| ValidationErrors::single("", rejection.body_text()))?;
        Ok(Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        ))
    } else {
        let Json(body) = Json::<Value>::from_request(request, &())
            .await
            .map_err(|rejection| ValidationErrors::single("", rejection.body_text()))?;
        Ok(body)
    }
}

// =============================================================================
// History
// =============================================================================

/// GET /api/history?limit&offset
///
/// Newest first. Missing parameters take their defaults; invalid ones are
/// all reported together.
pub async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> HandlerResult<HistoryResponse> {
    let Query(query) =
        query.map_err(|rejection| ValidationErrors::single("", rejection.body_text()))?;
    let pagination = validate_pagination(&query)?;

    let page = db_services::fetch_history(state.repository.as_ref(), pagination)
        .await
        .map_err(|e| state.server_fault(e))?;

    Ok(Json(page))
}

/// GET /api/history/{id}
pub async fn get_analysis(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> HandlerResult<AnalysisRecord> {
    let not_found = || AppError::NotFound {
        message: "Analysis not found".to_string(),
        path: uri.path().to_string(),
    };

    let id: AnalysisId = id.parse().map_err(|_| not_found())?;

    match db_services::get_analysis(state.repository.as_ref(), id).await {
        Ok(record) => Ok(Json(record)),
        Err(e) if e.is_not_found() => Err(not_found()),
        Err(e) => Err(state.server_fault(e)),
    }
}

/// GET /api/config
///
/// Read-only view of the scoring rules in effect.
pub async fn get_config(State(state): State<AppState>) -> HandlerResult<ScoringConfig> {
    Ok(Json(state.engine.config().clone()))
}

// =============================================================================
// Fallback
// =============================================================================

/// Any unmatched route. Reports the full request path, even under `/api`.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::route_not_found(uri.path())
}
