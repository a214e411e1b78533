use axum::{extract::State, Json};
use uuid::Uuid;

use crate::domain::{Project, ProjectPatch};
use crate::error::AppError;
use crate::middleware::auth::{Authorized, EditorOrAdmin, MaybeAuthenticated};
use crate::schemas::{CreateProjectRequest, ProjectListQuery, SuccessResponse, UpdateProjectRequest};
use crate::validation::{JsonBody, PathParam, QueryParams};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/projects",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Projects visible to the caller, newest first", body = [Project]),
        (status = 400, description = "Unknown category")
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    viewer: MaybeAuthenticated,
    QueryParams(query): QueryParams<ProjectListQuery>,
) -> Result<Json<Vec<Project>>, AppError> {
    let category = query.category()?;
    let projects = state.projects.list(viewer.role(), category).await?;
    Ok(Json(projects))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 403, description = "Draft requested without editor access"),
        (status = 404, description = "No such project")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    viewer: MaybeAuthenticated,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = state.projects.get(viewer.role(), id).await?;
    Ok(Json(project))
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = Project),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an editor or admin")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    auth: Authorized<EditorOrAdmin>,
    JsonBody(payload): JsonBody<CreateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let input = payload.into_new_project(auth.user_id)?;
    let project = state.projects.create(input).await?;
    Ok(Json(project))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Invalid field"),
        (status = 403, description = "Caller is not an editor or admin"),
        (status = 404, description = "No such project")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    _auth: Authorized<EditorOrAdmin>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let patch = ProjectPatch::try_from(payload)?;
    let project = state.projects.update(id, patch).await?;
    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted", body = SuccessResponse),
        (status = 403, description = "Caller is not an editor or admin"),
        (status = 404, description = "No such project")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    _auth: Authorized<EditorOrAdmin>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.projects.delete(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
