//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::{
    auth::TOKEN_COOKIE,
    state::{AppState, CurrentUser},
};

/// Middleware that checks the presented token against the stored one.
///
/// If valid, inserts the `CurrentUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the presented token
    let presented = presented_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Compare with the stored token
    let stored = state.identity.access_token().await.map_err(|e| {
        error!("Failed to read access token: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    if stored.as_deref() != Some(presented.as_str()) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // 3. Resolve the profile; a token without a readable profile is still signed in
    let user = state.identity.current_user().await.map_err(|e| {
        error!("Failed to read current user: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    req.extensions_mut().insert(CurrentUser(user));

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Reads the token from a bearer header or, for WebSocket upgrades, the cookie.
fn presented_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim().to_string());
    }

    let prefix = format!("{}=", TOKEN_COOKIE);
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix(prefix.as_str()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
