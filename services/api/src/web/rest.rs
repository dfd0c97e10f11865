//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    auth::{AuthResponse, LoginRequest, UserResponse},
    state::CurrentUser,
};
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use course_chat_core::{catalog::Catalog, domain::Copilot};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        me_handler,
        list_channels_handler,
    ),
    components(
        schemas(LoginRequest, AuthResponse, UserResponse, ChannelResponse)
    ),
    tags(
        (name = "Course Co-Pilot API", description = "API endpoints for the dashboard's chat assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One course channel or seeded conversation offered by a copilot.
#[derive(Serialize, ToSchema)]
pub struct ChannelResponse {
    id: String,
    label: String,
    color: String,
    title: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Returns the profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Signed in, but no readable profile is stored")
    )
)]
pub async fn me_handler(
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    current_user
        .0
        .map(|user| Json(UserResponse::from(user)))
        .ok_or((StatusCode::NOT_FOUND, "No user profile stored".to_string()))
}

/// Lists the channels a copilot starts with.
#[utoipa::path(
    get,
    path = "/copilots/{copilot}/channels",
    responses(
        (status = 200, description = "Channels in display order", body = [ChannelResponse]),
        (status = 400, description = "Unknown copilot"),
        (status = 401, description = "Not signed in")
    ),
    params(
        ("copilot" = String, Path, description = "One of `co-pilot`, `co-pilot2` or `chat-gpt`.")
    )
)]
pub async fn list_channels_handler(Path(copilot): Path<Copilot>) -> impl IntoResponse {
    let channels: Vec<ChannelResponse> = Catalog::for_copilot(copilot)
        .channels
        .into_iter()
        .map(|c| ChannelResponse {
            id: c.id.to_string(),
            label: c.label,
            color: c.color,
            title: c.title,
        })
        .collect();
    Json(channels)
}
