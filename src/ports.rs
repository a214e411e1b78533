//! Storage ports.
//! Handlers and services depend on these traits, never on a concrete store.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Category, Project, ProjectStatus, User};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_string())
            }
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: &User) -> RepositoryResult<User>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// All users, oldest first.
    async fn list(&self) -> RepositoryResult<Vec<User>>;

    /// Persists every field of `user`. Fails with `Conflict` on a duplicate email.
    async fn update(&self, user: &User) -> RepositoryResult<User>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}

/// Listing filter. `None` means "any".
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub category: Option<Category>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        self.status.map_or(true, |s| project.status == s)
            && self.category.map_or(true, |c| project.category == c)
    }
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: &Project) -> RepositoryResult<Project>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Project>;

    /// Newest first.
    async fn list(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>>;

    async fn update(&self, project: &Project) -> RepositoryResult<Project>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
