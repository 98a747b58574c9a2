use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};

use crate::{
    errors::ServiceError,
    services::users::RegisterUserRequest,
    ApiResponse, AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(register_user))
}

/// Register a user account. No session is established; callers authenticate
/// against the gateway that stamps the user id header.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.users.register_user(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}
