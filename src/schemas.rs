//! Request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Category, NewProject, ProjectPatch, ProjectStatus, Role, User};
use crate::services::accounts::{AdminUserUpdate, AuthSession, Registration, SelfUpdate};
use crate::validation::{
    clean_text, parse_enum, validate_required, ValidationError, AUTHOR_MAX_LEN, TITLE_MAX_LEN,
};

const ROLE_NAMES: &[&str] = &["admin", "editor", "subscriber"];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl From<UpdateMeRequest> for SelfUpdate {
    fn from(req: UpdateMeRequest) -> Self {
        SelfUpdate {
            name: req.name,
            email: req.email,
            current_password: req.current_password,
            new_password: req.new_password,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminCreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Defaults to `editor`.
    pub role: Option<String>,
}

impl AdminCreateUserRequest {
    pub fn into_parts(self) -> Result<(Registration, Option<Role>), ValidationError> {
        let role = self
            .role
            .as_deref()
            .map(|role| parse_enum::<Role>("role", role, ROLE_NAMES))
            .transpose()?;
        let registration = Registration {
            name: self.name,
            email: self.email,
            password: self.password,
        };
        Ok((registration, role))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCreateUserResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<AdminUpdateUserRequest> for AdminUserUpdate {
    type Error = ValidationError;

    fn try_from(req: AdminUpdateUserRequest) -> Result<Self, Self::Error> {
        let role = req
            .role
            .as_deref()
            .map(|role| parse_enum::<Role>("role", role, ROLE_NAMES))
            .transpose()?;
        Ok(AdminUserUpdate {
            name: req.name,
            email: req.email,
            role,
            password: req.password,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ToggleActiveRequest {
    /// Explicit target state; the flag is flipped when omitted.
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: String,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: String,
    /// Defaults to `draft`.
    pub status: Option<String>,
}

impl CreateProjectRequest {
    pub fn into_new_project(self, created_by: Uuid) -> Result<NewProject, ValidationError> {
        let title = clean_text("title", &self.title, TITLE_MAX_LEN)?;
        let category = parse_enum::<Category>("category", &self.category, Category::NAMES)?;
        validate_required("content", &self.content)?;
        let author = clean_text("author", &self.author, AUTHOR_MAX_LEN)?;
        let status = self
            .status
            .as_deref()
            .map(|status| parse_enum::<ProjectStatus>("status", status, ProjectStatus::NAMES))
            .transpose()?
            .unwrap_or_default();

        Ok(NewProject {
            title,
            subtitle: optional_text(self.subtitle),
            category,
            content: self.content,
            image_url: optional_text(self.image_url),
            author,
            created_by,
            status,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    /// An empty string clears the subtitle.
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    /// An empty string clears the image.
    pub image_url: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<UpdateProjectRequest> for ProjectPatch {
    type Error = ValidationError;

    fn try_from(req: UpdateProjectRequest) -> Result<Self, Self::Error> {
        Ok(ProjectPatch {
            title: req
                .title
                .map(|title| clean_text("title", &title, TITLE_MAX_LEN))
                .transpose()?,
            subtitle: req.subtitle.map(|s| optional_text(Some(s))),
            category: req
                .category
                .as_deref()
                .map(|c| parse_enum::<Category>("category", c, Category::NAMES))
                .transpose()?,
            content: req
                .content
                .map(|content| validate_required("content", &content).map(|_| content))
                .transpose()?,
            image_url: req.image_url.map(|url| optional_text(Some(url))),
            author: req
                .author
                .map(|author| clean_text("author", &author, AUTHOR_MAX_LEN))
                .transpose()?,
            status: req
                .status
                .as_deref()
                .map(|s| parse_enum::<ProjectStatus>("status", s, ProjectStatus::NAMES))
                .transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    /// One of `Paper`, `Digital`, `Editorial`.
    pub category: Option<String>,
}

impl ProjectListQuery {
    pub fn category(&self) -> Result<Option<Category>, ValidationError> {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| parse_enum::<Category>("category", c, Category::NAMES))
            .transpose()
    }
}

/// Multipart form accepted by `POST /uploads`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
