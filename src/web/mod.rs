// Web server — Axum JSON API over the recommendation engine.
//
// All /api/* routes need an `X-User-Id` header (see auth.rs); /health is
// open. Handlers are thin: they call the LikeRegistry / RecommendationStore
// and map EngineError to status codes.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::db::Database;
use crate::error::EngineError;
use crate::likes::LikeRegistry;
use crate::recommend::RecommendSettings;

pub mod auth;
pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub likes: LikeRegistry,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, settings: RecommendSettings) -> Self {
        let likes = LikeRegistry::new(db.clone(), settings);
        Self { db, likes }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Wayfarer API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    // Routes that act on behalf of a user
    let user_api = Router::new()
        .route("/api/locations", get(handlers::locations::list_locations))
        .route("/api/like-location", post(handlers::likes::like_location))
        .route(
            "/api/toggle-like/{location_id}",
            post(handlers::likes::toggle_like),
        )
        .route(
            "/api/is-liked/{location_id}",
            get(handlers::likes::is_liked),
        )
        .route("/api/liked", get(handlers::likes::liked_locations))
        .route(
            "/api/suggest",
            get(handlers::recommendations::get_recommendations),
        )
        .route(
            "/api/refresh",
            post(handlers::recommendations::refresh_recommendations),
        )
        .layer(axum::middleware::from_fn(auth::require_user));

    let public_api = Router::new().route("/health", get(health));

    Router::new()
        .merge(user_api)
        .merge(public_api)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::HeaderName::from_static(auth::USER_HEADER),
                ]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        match &self {
            EngineError::LocationNotFound(_) => api_error(StatusCode::NOT_FOUND, "Location not found"),
            EngineError::DuplicateLike { .. } => api_error(
                StatusCode::BAD_REQUEST,
                "You already liked this location",
            ),
            EngineError::Storage(e) => {
                error!(error = %e, "Storage error");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        }
    }
}
