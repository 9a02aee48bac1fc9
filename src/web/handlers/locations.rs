// GET /api/locations — every location, in id order.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::EngineError;
use crate::web::AppState;

pub async fn list_locations(State(state): State<AppState>) -> Response {
    match state.db.list_locations().await {
        Ok(locations) => Json(locations).into_response(),
        Err(e) => EngineError::Storage(e).into_response(),
    }
}
