// Like handlers.
//
// POST /api/like-location           — body {"location_id": n}; 201, 400 on duplicate
// POST /api/toggle-like/{id}        — {"liked": bool, "message": ...}
// GET  /api/is-liked/{id}           — {"liked": bool}
// GET  /api/liked                   — the caller's liked locations

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::db::models::UserId;
use crate::web::AppState;

#[derive(Deserialize)]
pub struct LikeRequest {
    pub location_id: i64,
}

pub async fn like_location(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    Json(body): Json<LikeRequest>,
) -> Response {
    match state.likes.like(&user, body.location_id).await {
        Ok(liked) => (StatusCode::CREATED, Json(liked)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    Path(location_id): Path<i64>,
) -> Response {
    match state.likes.toggle(&user, location_id).await {
        Ok(outcome) => {
            let message = if outcome.liked {
                "Location liked"
            } else {
                "Location unliked"
            };
            Json(serde_json::json!({ "liked": outcome.liked, "message": message })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn is_liked(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    Path(location_id): Path<i64>,
) -> Response {
    match state.likes.is_liked(&user, location_id).await {
        Ok(liked) => Json(serde_json::json!({ "liked": liked })).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn liked_locations(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Response {
    match state.likes.liked_locations(&user).await {
        Ok(liked) => {
            let body: Vec<serde_json::Value> = liked
                .into_iter()
                .map(|l| {
                    serde_json::json!({
                        "id": l.location.id,
                        "name": l.location.name,
                        "description": l.location.description,
                        "state": l.location.state,
                        "city": l.location.city,
                        "zone": l.location.zone,
                        "entry_price": l.location.entry_price,
                        "liked_id": l.liked_id,
                    })
                })
                .collect();
            Json(body).into_response()
        }
        Err(e) => e.into_response(),
    }
}
