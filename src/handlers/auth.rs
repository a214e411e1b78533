use axum::{extract::State, Json};

use crate::error::AppError;
use crate::schemas::{AuthResponse, LoginRequest, RegisterRequest};
use crate::validation::JsonBody;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created with the subscriber role", body = AuthResponse),
        (status = 400, description = "Missing fields or email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state.accounts.register(payload.into()).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AuthResponse),
        (status = 400, description = "Unknown email or wrong password"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(session.into()))
}
