use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::domain::{Category, Project, ProjectStatus, Role};
use crate::handlers;
use crate::health::{DependencyStatus, HealthResponse};
use crate::schemas::{
    AdminCreateUserRequest, AdminCreateUserResponse, AdminUpdateUserRequest, AuthResponse,
    CreateProjectRequest, LoginRequest, RegisterRequest, SuccessResponse, ToggleActiveRequest,
    UpdateMeRequest, UpdateProjectRequest, UploadForm, UploadResponse, UserResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::users::me,
        handlers::users::update_me,
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::admin::list_users,
        handlers::admin::create_user,
        handlers::admin::update_user,
        handlers::admin::toggle_user,
        handlers::admin::delete_user,
        handlers::uploads::upload_file,
    ),
    components(schemas(
        HealthResponse,
        DependencyStatus,
        Role,
        Category,
        ProjectStatus,
        Project,
        UserResponse,
        AuthResponse,
        RegisterRequest,
        LoginRequest,
        UpdateMeRequest,
        AdminCreateUserRequest,
        AdminCreateUserResponse,
        AdminUpdateUserRequest,
        ToggleActiveRequest,
        CreateProjectRequest,
        UpdateProjectRequest,
        UploadForm,
        UploadResponse,
        SuccessResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "User", description = "Caller's own profile"),
        (name = "Projects", description = "Editorial projects"),
        (name = "Admin", description = "Account administration"),
        (name = "Uploads", description = "Image uploads"),
        (name = "Health", description = "Liveness and dependency status")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
