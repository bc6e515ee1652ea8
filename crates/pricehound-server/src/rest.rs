// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for the fetch engine.
//!
//! Every handler is a thin shim over [`FetchOrchestrator`]; engine errors
//! become `{"error": {"code", "message"}}` bodies with a mapped status.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pricehound::{EngineError, FetchOrchestrator, FetchRequest, MetricSample, ECOMMERCE_PRODUCT};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by all handlers.
pub struct AppState {
    pub engine: Arc<FetchOrchestrator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(engine: Arc<FetchOrchestrator>) -> Self {
        Self {
            engine,
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/fetch", post(handle_fetch))
        .route("/api/fetch/health", get(fetch_health))
        .route("/api/fetch/supported-sources", get(supported_sources))
        .route("/api/fetch/fetchers", get(list_fetchers))
        .route("/api/fetch/best-fetcher", get(best_fetcher))
        .route("/api/fetch/validate", post(validate_url))
        .route("/api/fetch/analyze", get(analyze_url))
        .route("/api/fetch/stats", get(registry_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `addr` until ctrl-c.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────

/// An engine error on its way out as an HTTP response.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            EngineError::InvalidInput(_) | EngineError::UnsupportedSource(_) => {
                StatusCode::BAD_REQUEST
            }
            EngineError::AllProvidersExhausted { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut error = json!({
            "code": self.0.kind(),
            "message": self.0.to_string(),
        });
        if let EngineError::AllProvidersExhausted { failures, .. } = &self.0 {
            error["failures"] = json!(failures);
        }
        if status.is_server_error() {
            tracing::warn!(code = self.0.kind(), error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": error }))).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn handle_fetch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<MetricSample>, ApiError> {
    let sample = state.engine.fetch(&request).await?;
    Ok(Json(sample))
}

async fn fetch_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "UP",
        "service": "fetch",
        "providers": state.engine.stats().total_providers,
    }))
}

async fn supported_sources() -> Json<Vec<&'static str>> {
    Json(vec![ECOMMERCE_PRODUCT])
}

async fn list_fetchers(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.engine.providers()))
}

#[derive(Debug, Deserialize)]
struct UrlParams {
    #[serde(default)]
    url: String,
}

fn require_url(url: &str) -> Result<&str, ApiError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(EngineError::InvalidInput("url is required".to_string()).into());
    }
    Ok(url)
}

async fn best_fetcher(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<Value>, ApiError> {
    let url = require_url(&params.url)?;
    Ok(Json(json!({
        "url": url,
        "bestFetcher": state.engine.best_provider_name(url),
        "supported": state.engine.is_url_supported(url),
    })))
}

async fn validate_url(
    State(state): State<Arc<AppState>>,
    Json(params): Json<UrlParams>,
) -> Response {
    let url = params.url.trim();
    if url.is_empty() {
        let body = json!({ "valid": false, "reason": "URL cannot be empty" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }
    Json(json!({
        "valid": true,
        "url": url,
        "bestFetcher": state.engine.best_provider_name(url),
        "supported": state.engine.is_url_supported(url),
    }))
    .into_response()
}

async fn analyze_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<Value>, ApiError> {
    let url = require_url(&params.url)?;
    Ok(Json(json!(state.engine.analyze(url))))
}

async fn registry_stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.engine.stats()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (EngineError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (EngineError::UnsupportedSource("X".into()), StatusCode::BAD_REQUEST),
            (EngineError::InvalidConfig("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                EngineError::AllProvidersExhausted {
                    url: "u".into(),
                    failures: vec![],
                    last: Box::new(EngineError::InvalidConfig("x".into())),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn test_require_url_trims() {
        assert_eq!(require_url("  https://a.test/p/1 ").ok(), Some("https://a.test/p/1"));
        assert!(require_url("   ").is_err());
    }
}
