//! In-memory repositories backing the router-level test suite.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Project, User};
use crate::ports::{
    ProjectFilter, ProjectRepository, RepositoryError, RepositoryResult, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", id)))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id != user.id && u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", user.id)))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<Vec<Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &Project) -> RepositoryResult<Project> {
        self.projects.write().await.push(project.clone());
        Ok(project.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Project> {
        self.projects
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("project {}", id)))
    }

    async fn list(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        // Same order as the Postgres adapter: newest first, ties broken by id.
        projects.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(projects)
    }

    async fn update(&self, project: &Project) -> RepositoryResult<Project> {
        let mut projects = self.projects.write().await;
        let slot = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("project {}", project.id)))?;
        *slot = project.clone();
        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(RepositoryError::NotFound(format!("project {}", id)));
        }
        Ok(())
    }
}
