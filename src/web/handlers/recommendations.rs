// Recommendation handlers.
//
// GET  /api/suggest — stored recommendations, or the substring fallback
// POST /api/refresh — recompute now and report what was stored

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use crate::db::models::UserId;
use crate::recommend::RefreshOutcome;
use crate::web::AppState;

pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Response {
    match state.likes.store().read(&user).await {
        Ok(locations) => Json(locations).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn refresh_recommendations(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Response {
    match state.likes.store().refresh(&user).await {
        Ok(RefreshOutcome::Stored(ids)) => {
            Json(serde_json::json!({ "status": "stored", "count": ids.len() })).into_response()
        }
        Ok(RefreshOutcome::Cleared) => {
            Json(serde_json::json!({ "status": "cleared", "count": 0 })).into_response()
        }
        Err(e) => e.into_response(),
    }
}
