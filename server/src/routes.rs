//! HTTP surface.
//!
//! - `POST /policy-evaluate`: evaluate one event against the rules in the
//!   body; 200 verdict, 400 itemized issues, 500 on internal faults
//! - `GET  /health`: liveness
//! - `GET  /audit`: ledger summary and chain integrity

use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use complyr_audit::InMemoryAuditWriter;
use complyr_contracts::error::{ComplyrError, ComplyrResult, ValidationIssue};
use complyr_core::{Evaluation, EvaluationService};
use complyr_policy::RuleEngine;
use complyr_validate::SchemaValidator;

use crate::config::{HttpConfig, ServerConfig};

/// Shared state for every handler.
pub struct AppState {
    pub service: Arc<EvaluationService>,
    pub ledger: Arc<InMemoryAuditWriter>,
}

impl AppState {
    /// Wire the schema validator, rule engine and a fresh bounded ledger.
    pub fn from_config(config: &ServerConfig) -> ComplyrResult<Self> {
        let ledger_id = config
            .audit
            .ledger_id
            .clone()
            .unwrap_or_else(|| format!("ledger-{}", uuid::Uuid::new_v4()));
        let ledger = Arc::new(InMemoryAuditWriter::bounded(
            ledger_id,
            config.audit.max_entries,
        ));
        let service = EvaluationService::new(
            Box::new(SchemaValidator::new()?),
            Box::new(RuleEngine::new()),
            ledger.clone(),
        );
        Ok(Self::new(service, ledger))
    }

    pub fn new(service: EvaluationService, ledger: Arc<InMemoryAuditWriter>) -> Self {
        Self {
            service: Arc::new(service),
            ledger,
        }
    }
}

/// Build the router with all endpoints and middleware.
pub fn router(state: Arc<AppState>, http: &HttpConfig) -> Router {
    let mut app = Router::new()
        .route("/policy-evaluate", post(policy_evaluate))
        .route("/health", get(health))
        .route("/audit", get(audit_summary))
        .with_state(state)
        .layer(DefaultBodyLimit::max(http.max_body_bytes));

    if http.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Bind `listen` and serve until Ctrl-C.
pub async fn serve(listen: &str, state: Arc<AppState>, http: &HttpConfig) -> ComplyrResult<()> {
    let app = router(state, http);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(listen = %listen, "policy-evaluate listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    error: &'static str,
    issues: &'a [ValidationIssue],
}

/// Maps a `ComplyrError` onto the endpoint's error contract.
pub struct ApiError(pub ComplyrError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ComplyrError::Validation { issues } => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody {
                    error: "validation failed",
                    issues: &issues,
                }),
            )
                .into_response(),
            other => {
                error!(error = %other, "request failed");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!(panic = %detail, "handler panicked");
    internal_error()
}

// ─── Handlers ───────────────────────────────────────────────────────────────

/// `POST /policy-evaluate`
async fn policy_evaluate(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Evaluation { verdict, record } = match state.service.evaluate_body(&body) {
        Ok(evaluation) => evaluation,
        Err(e) => return ApiError(e).into_response(),
    };

    // Detached: the response never waits on the ledger.
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || service.record(&record));

    Json(verdict).into_response()
}

/// `GET /health`
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /audit`
async fn audit_summary(State(state): State<Arc<AppState>>) -> Response {
    let ledger = Arc::clone(&state.ledger);
    let summary = tokio::task::spawn_blocking(move || ledger.summary()).await;

    match summary {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            error!(error = %e, "audit summary task failed");
            internal_error()
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
