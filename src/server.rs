//! HTTP server for the analysis pipeline.
//!
//! Exposes the analyzer via a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/analyze` | Classify the query text and search the corpus |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/*` | Static frontend assets from `[server].static_dir` |
//!
//! # Error Contract
//!
//! Error responses carry a flat JSON body:
//!
//! ```json
//! { "error": "No text provided" }
//! ```
//!
//! Status codes: `400` for missing/empty query text, `503` when the
//! classifier or corpus cannot be initialized, `500` for inference
//! failures.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser clients
//! hosted elsewhere can call the API cross-origin; the bundled frontend
//! under `static/` is served same-origin and needs none of it.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::models::AnalysisResult;
use crate::pipeline::{AnalyzeError, Analyzer};

/// Starts the HTTP server.
///
/// Initializes the engine eagerly so a misconfigured model or dataset path
/// fails at startup instead of on the first request, then binds to the
/// address configured in `[server].bind` and serves until the process is
/// terminated.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let static_dir = config.server.static_dir.clone();
    let analyzer = Arc::new(Analyzer::new(config));

    let engine = analyzer.engine().await?;
    println!(
        "Loaded model '{}' with {} corpus records",
        engine.classifier.model_name(),
        engine.corpus.len()
    );

    let app = router(analyzer, &static_dir);

    println!("query-lens listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router.
///
/// API routes take precedence; everything else falls through to the static
/// frontend directory (`index.html` is served at `/`).
pub fn router(analyzer: Arc<Analyzer>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/health", get(handle_health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(analyzer)
}

// ============ Error response ============

/// Flat JSON error body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an HTTP response.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        let status = match err {
            AnalyzeError::InvalidInput => StatusCode::BAD_REQUEST,
            AnalyzeError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AnalyzeError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /analyze ============

/// JSON request body for `POST /analyze`.
///
/// A missing `text` field is treated the same as an empty one.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

/// Handler for `POST /analyze`.
///
/// Runs the full pipeline and returns the combined classification and
/// retrieval result.
async fn handle_analyze(
    State(analyzer): State<Arc<Analyzer>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let result = analyzer.analyze(&request.text).await?;
    Ok(Json(result))
}
