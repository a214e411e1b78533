use axum::{extract::State, Json};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::{AdminOnly, Authorized};
use crate::schemas::{
    AdminCreateUserRequest, AdminCreateUserResponse, AdminUpdateUserRequest, SuccessResponse,
    ToggleActiveRequest, UserResponse,
};
use crate::services::accounts::AdminUserUpdate;
use crate::validation::{JsonBody, OptionalJsonBody, PathParam};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.accounts.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/register",
    request_body = AdminCreateUserRequest,
    responses(
        (status = 200, description = "Account created", body = AdminCreateUserResponse),
        (status = 400, description = "Missing fields, unknown role or email already registered"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    JsonBody(payload): JsonBody<AdminCreateUserRequest>,
) -> Result<Json<AdminCreateUserResponse>, AppError> {
    let (registration, role) = payload.into_parts()?;
    let user = state.accounts.create_by_admin(registration, role).await?;

    Ok(Json(AdminCreateUserResponse {
        message: "User created".to_string(),
        user: user.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid field or email already registered"),
        (status = 404, description = "No such user")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<AdminUpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let update = AdminUserUpdate::try_from(payload)?;
    let user = state.accounts.update_by_admin(id, update).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/admin/users/{id}/toggle",
    params(("id" = Uuid, Path, description = "User id")),
    request_body(content = ToggleActiveRequest, description = "Optional; the flag flips when omitted"),
    responses(
        (status = 200, description = "Activation changed", body = UserResponse),
        (status = 400, description = "Admin targeted their own account or the body is not valid JSON"),
        (status = 404, description = "No such user")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn toggle_user(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    PathParam(id): PathParam<Uuid>,
    OptionalJsonBody(payload): OptionalJsonBody<ToggleActiveRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let active = payload.and_then(|body| body.active);
    let user = state
        .accounts
        .toggle_active(auth.user_id, id, active)
        .await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted", body = SuccessResponse),
        (status = 400, description = "Admin targeted their own account"),
        (status = 404, description = "No such user")
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: Authorized<AdminOnly>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.accounts.delete_user(auth.user_id, id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
