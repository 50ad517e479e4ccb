//! # Surveyor HTTP API Module
//!
//! This module implements the survey pages using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - List selectable surveys
//! - `POST /` - Select a survey (`survey_code` form field)
//! - `POST /begin` - Start the selected survey from question 0
//! - `POST /answer` - Record an answer (`answer`, optional `text`)
//! - `GET /questions/{index}` - Show the next unanswered question
//! - `GET /complete` - Show the summary and set the completion cookie
//! - `GET /health` - Health check
//!
//! Pages render as JSON (`{"view": {...}, "messages": [...]}`); navigation
//! corrections are `303 See Other` redirects.

mod handlers;
mod markers;
mod middleware;
mod sessions;
mod types;

// Re-exports for external use
pub use markers::CookieMarkers;
pub use middleware::{DEFAULT_RPS, create_rate_limiter};
pub use sessions::{SESSION_COOKIE, SessionStore};
// Re-export handlers and types for integration tests (via `surveyor::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    answer_handler, begin_handler, complete_handler, health_handler, question_handler,
    select_handler, selection_handler,
};
#[allow(unused_imports)]
pub use types::{AnswerForm, ErrorResponse, HealthResponse, PageResponse, SelectForm};

use crate::config::Settings;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use surveyor_core::{Catalog, Progression, SurveyError};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (64 KB). Answers are small form posts.
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the catalog, the session store and settings.
#[derive(Clone)]
pub struct AppState {
    /// The survey catalog, read-only after startup.
    pub catalog: Arc<Catalog>,
    /// Per-client session state.
    pub sessions: SessionStore,
    /// Resolved settings.
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create new app state.
    #[must_use]
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: SessionStore::new(settings.session_ttl),
            settings: Arc::new(settings),
        }
    }

    /// Progression engine over this state's catalog.
    pub fn progression(&self) -> Progression<'_> {
        Progression::new(&self.catalog).with_completion_ttl(self.settings.completion_ttl)
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from the configured origin list.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (SURVEYOR_CORS_ORIGINS=*). Session cookies become reachable from any site!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SURVEYOR_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
                    .allow_credentials(true)
            }
        }
        None => {
            tracing::info!("CORS: No SURVEYOR_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5000",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.settings.cors_origins.as_deref());

    let rate_limiter = create_rate_limiter(state.settings.rate_limit);
    match &rate_limiter {
        Some(_) => tracing::info!(
            "Rate limiting enabled: {} requests/second",
            state.settings.rate_limit
        ),
        None => tracing::info!("Rate limiting disabled"),
    }

    let mut router = Router::new()
        .route(
            "/",
            get(handlers::selection_handler).post(handlers::select_handler),
        )
        .route("/begin", post(handlers::begin_handler))
        .route("/answer", post(handlers::answer_handler))
        .route("/questions/{index}", get(handlers::question_handler))
        .route("/complete", get(handlers::complete_handler))
        .route("/health", get(handlers::health_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, catalog: Catalog, settings: Settings) -> Result<(), SurveyError> {
    let state = AppState::new(catalog, settings);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SurveyError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Surveyor HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SurveyError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
