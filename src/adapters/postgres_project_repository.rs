//! Postgres implementation of ProjectRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Category, Project, ProjectStatus};
use crate::ports::{ProjectFilter, ProjectRepository, RepositoryError, RepositoryResult};

const PROJECT_COLUMNS: &str = "id, title, subtitle, category, content, image_url, author, \
     created_by, status, created_at, updated_at";

/// Postgres-backed project repository.
#[derive(Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &Project) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (
                id, title, subtitle, category, content, image_url, author,
                created_by, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.subtitle)
        .bind(project.category.as_str())
        .bind(&project.content)
        .bind(&project.image_url)
        .bind(&project.author)
        .bind(project.created_by)
        .bind(project.status.as_str())
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.into_domain()
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("project {}", id)))?
            .into_domain()
    }

    async fn list(&self, filter: ProjectFilter) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE ($1::text IS NULL OR status = $1)
            AND ($2::text IS NULL OR category = $2)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(ProjectRow::into_domain).collect()
    }

    async fn update(&self, project: &Project) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET title = $2, subtitle = $3, category = $4, content = $5, image_url = $6,
                author = $7, status = $8, updated_at = $9
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.subtitle)
        .bind(project.category.as_str())
        .bind(&project.content)
        .bind(&project.image_url)
        .bind(&project.author)
        .bind(project.status.as_str())
        .bind(project.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("project {}", project.id)))?
            .into_domain()
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("project {}", id)));
        }
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    subtitle: Option<String>,
    category: String,
    content: String,
    image_url: Option<String>,
    author: String,
    created_by: Uuid,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProjectRow {
    fn into_domain(self) -> RepositoryResult<Project> {
        let category = self
            .category
            .parse::<Category>()
            .map_err(RepositoryError::Database)?;
        let status = self
            .status
            .parse::<ProjectStatus>()
            .map_err(RepositoryError::Database)?;

        Ok(Project {
            id: self.id,
            title: self.title,
            subtitle: self.subtitle,
            category,
            content: self.content,
            image_url: self.image_url,
            author: self.author,
            created_by: self.created_by,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
