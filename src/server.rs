//! HTTP surface for the limerick service.
//!
//! Thin plumbing over the orchestrator: a JSON generation endpoint, a
//! health check reporting the configured model, and static asset
//! hosting. All request state is request-local; `AppState` holds only
//! the shared orchestrator.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::orchestrator::{Orchestrator, PoemRequest};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Body of a generation request.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    /// Free-form letters input; any length or content is accepted.
    #[serde(default)]
    pub letters: String,
    /// Integer-like poem count: a JSON number or a numeric string.
    #[serde(default)]
    pub count: Option<serde_json::Value>,
    /// Whether to include Japanese translations. The original client
    /// sent this as `jpWanted`.
    #[serde(default, alias = "jpWanted")]
    pub translate: bool,
}

/// Successful generation response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// Error payload returned with a failure status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model: String,
}

/// Builds the service router: API routes, CORS and trace layers, and
/// static assets as the fallback.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Health check endpoint: liveness plus the configured model id.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        model: state.orchestrator.model().to_string(),
    })
}

/// Generation endpoint.
async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = PoemRequest {
        letters: body.letters,
        count: coerce_count(body.count.as_ref()),
        translate: body.translate,
    };

    match state.orchestrator.generate(request).await {
        Ok(outcome) => Ok(Json(GenerateResponse { text: outcome.text })),
        Err(err) => {
            warn!("Generation request failed: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

/// Coerce an integer-like JSON value into an integer.
///
/// Accepts JSON numbers (floats are truncated) and numeric strings;
/// anything else counts as absent and falls back to the default count.
fn coerce_count(value: Option<&serde_json::Value>) -> Option<i64> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
