//! services/api/src/web/auth.rs
//!
//! Demo login and logout. There is a single mock account; a successful login
//! stores a token and profile in the identity key-value store.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use course_chat_core::domain::UserProfile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::adapters::identity::{clear_auth, persist_login};
use crate::web::state::AppState;

pub const TOKEN_COOKIE: &str = "access_token";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Login with the demo account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let config = &state.config;

    // 1. Simulate the round trip to an auth backend
    tokio::time::sleep(config.login_delay).await;

    // 2. Check against the demo account
    if req.email != config.demo_email || req.password != config.demo_password {
        return Err((
            StatusCode::UNAUTHORIZED,
            format!(
                "Invalid email or password. Use {} / {}",
                config.demo_email, config.demo_password
            ),
        ));
    }

    // 3. Store token and profile
    let access_token = Uuid::new_v4().to_string();
    let user = UserProfile {
        id: Some(1),
        name: config.demo_name.clone(),
        email: req.email,
    };
    persist_login(state.store.as_ref(), &access_token, &user)
        .await
        .map_err(|e| {
            error!("Failed to persist login: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Login failed. Please check your credentials and try again.".to_string(),
            )
        })?;
    info!("Demo user {} logged in.", user.email);

    // 4. Create token cookie
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        TOKEN_COOKIE,
        access_token,
        Duration::days(30).num_seconds()
    );

    let response = AuthResponse {
        access_token,
        user: user.into(),
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Forget the stored identity
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    clear_auth(state.store.as_ref()).await.map_err(|e| {
        error!("Failed to clear auth: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
    })?;

    let cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", TOKEN_COOKIE);

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}
