use axum::{extract::State, Json};

use crate::error::AppError;
use crate::middleware::auth::{AnyRole, Authorized};
use crate::schemas::{UpdateMeRequest, UserResponse};
use crate::validation::JsonBody;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "Caller's profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "User"
)]
pub async fn me(
    State(state): State<AppState>,
    auth: Authorized<AnyRole>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.accounts.profile(auth.user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/user/me",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid field or wrong current password"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "User"
)]
pub async fn update_me(
    State(state): State<AppState>,
    auth: Authorized<AnyRole>,
    JsonBody(payload): JsonBody<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .accounts
        .update_self(auth.user_id, payload.into())
        .await?;
    Ok(Json(user.into()))
}
