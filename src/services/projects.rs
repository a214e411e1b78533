//! Project reads with role-dependent visibility, and editor-only writes.
//!
//! Any editor or admin may modify any project; there is no per-author ownership check.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Category, NewProject, Project, ProjectPatch, ProjectStatus, Role};
use crate::error::AppError;
use crate::ports::{ProjectFilter, ProjectRepository, RepositoryError};

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Newest first. Anonymous callers and subscribers only see published projects.
    pub async fn list(
        &self,
        viewer: Option<Role>,
        category: Option<Category>,
    ) -> Result<Vec<Project>, AppError> {
        let filter = ProjectFilter {
            status: (!sees_drafts(viewer)).then_some(ProjectStatus::Published),
            category,
        };
        Ok(self.projects.list(filter).await?)
    }

    pub async fn get(&self, viewer: Option<Role>, id: Uuid) -> Result<Project, AppError> {
        let project = self.find(id).await?;
        if !project.is_published() && !sees_drafts(viewer) {
            return Err(AppError::Forbidden("This project is not published".to_string()));
        }
        Ok(project)
    }

    pub async fn create(&self, input: NewProject) -> Result<Project, AppError> {
        let project = self.projects.insert(&Project::new(input)).await?;
        tracing::info!(
            project_id = %project.id,
            created_by = %project.created_by,
            status = %project.status,
            "Project created"
        );
        Ok(project)
    }

    pub async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, AppError> {
        let mut project = self.find(id).await?;
        project.apply(patch);
        let project = self.projects.update(&project).await.map_err(not_found)?;
        tracing::info!(project_id = %project.id, status = %project.status, "Project updated");
        Ok(project)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.projects.delete(id).await.map_err(not_found)?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Project, AppError> {
        self.projects.get_by_id(id).await.map_err(not_found)
    }
}

fn sees_drafts(viewer: Option<Role>) -> bool {
    viewer.map_or(false, |role| role.can_edit_projects())
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound(_) => AppError::NotFound("Project not found".to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryProjectRepository;

    fn input(status: ProjectStatus) -> NewProject {
        NewProject {
            title: "Title".to_string(),
            subtitle: None,
            category: Category::Editorial,
            content: "<p>hello</p>".to_string(),
            image_url: None,
            author: "Author".to_string(),
            created_by: Uuid::new_v4(),
            status,
        }
    }

    #[tokio::test]
    async fn visibility_depends_on_role() {
        let service = ProjectService::new(Arc::new(InMemoryProjectRepository::new()));
        service.create(input(ProjectStatus::Draft)).await.unwrap();
        service.create(input(ProjectStatus::Published)).await.unwrap();

        assert_eq!(service.list(None, None).await.unwrap().len(), 1);
        assert_eq!(service.list(Some(Role::Subscriber), None).await.unwrap().len(), 1);
        assert_eq!(service.list(Some(Role::Editor), None).await.unwrap().len(), 2);
        assert_eq!(service.list(Some(Role::Admin), None).await.unwrap().len(), 2);
        assert!(service
            .list(Some(Role::Admin), Some(Category::Paper))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn draft_is_forbidden_to_readers() {
        let service = ProjectService::new(Arc::new(InMemoryProjectRepository::new()));
        let draft = service.create(input(ProjectStatus::Draft)).await.unwrap();

        assert!(matches!(
            service.get(None, draft.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.get(Some(Role::Subscriber), draft.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(service.get(Some(Role::Editor), draft.id).await.unwrap().id, draft.id);
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let service = ProjectService::new(Arc::new(InMemoryProjectRepository::new()));
        let id = Uuid::new_v4();

        assert!(matches!(service.get(None, id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(id, ProjectPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(id).await, Err(AppError::NotFound(_))));
    }
}
