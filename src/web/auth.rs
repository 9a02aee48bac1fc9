// User identity middleware.
//
// Authentication happens upstream of this service. Requests carry the
// already-authenticated user in the `X-User-Id` header; this middleware
// turns it into a `UserId` request extension and rejects requests without
// one.

use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::db::models::UserId;

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-user-id";

/// Axum middleware: reject requests without a user id with 401.
pub async fn require_user(mut request: Request, next: Next) -> Response {
    let Some(user) = user_from_headers(request.headers()) else {
        return super::api_error(StatusCode::UNAUTHORIZED, "Missing X-User-Id header");
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Read a non-blank user id from the headers.
pub fn user_from_headers(headers: &HeaderMap) -> Option<UserId> {
    let raw = headers.get(USER_HEADER)?.to_str().ok()?.trim();
    if raw.is_empty() {
        None
    } else {
        Some(UserId::new(raw))
    }
}
