//! Project domain entity.
//! A project is an editorial post: rich-text content plus cover image and category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Paper,
    Digital,
    Editorial,
}

impl Category {
    pub const NAMES: &'static [&'static str] = &["Paper", "Digital", "Editorial"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Paper => "Paper",
            Category::Digital => "Digital",
            Category::Editorial => "Editorial",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paper" => Ok(Category::Paper),
            "Digital" => Ok(Category::Digital),
            "Editorial" => Ok(Category::Editorial),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Published,
}

impl ProjectStatus {
    pub const NAMES: &'static [&'static str] = &["draft", "published"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Published => "published",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "published" => Ok(ProjectStatus::Published),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub category: Category,
    pub content: String,
    pub image_url: Option<String>,
    pub author: String,
    pub created_by: Uuid,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: NewProject) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            subtitle: input.subtitle,
            category: input.category,
            content: input.content,
            image_url: input.image_url,
            author: input.author,
            created_by: input.created_by,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }

    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub subtitle: Option<String>,
    pub category: Category,
    pub content: String,
    pub image_url: Option<String>,
    pub author: String,
    pub created_by: Uuid,
    pub status: ProjectStatus,
}

/// Field-level changes to a project. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub category: Option<Category>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub author: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        Project::new(NewProject {
            title: "Title".to_string(),
            subtitle: None,
            category: Category::Paper,
            content: "<p>body</p>".to_string(),
            image_url: None,
            author: "Author".to_string(),
            created_by: Uuid::new_v4(),
            status: ProjectStatus::default(),
        })
    }

    #[test]
    fn default_status_is_draft() {
        let project = sample();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert!(!project.is_published());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["category"], "Paper");
        assert_eq!(json["status"], "draft");
        assert!(json.get("createdBy").is_some());
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn patch_publishes_and_keeps_other_fields() {
        let mut project = sample();
        project.apply(ProjectPatch {
            status: Some(ProjectStatus::Published),
            ..Default::default()
        });
        assert!(project.is_published());
        assert_eq!(project.title, "Title");
    }

    #[test]
    fn patch_sets_and_clears_optional_fields() {
        let mut project = sample();
        project.apply(ProjectPatch {
            subtitle: Some(Some("Sub".to_string())),
            image_url: Some(Some("http://host/uploads/a.png".to_string())),
            ..Default::default()
        });
        assert_eq!(project.subtitle.as_deref(), Some("Sub"));

        project.apply(ProjectPatch {
            subtitle: Some(None),
            ..Default::default()
        });
        assert!(project.subtitle.is_none());
        assert_eq!(project.image_url.as_deref(), Some("http://host/uploads/a.png"));
    }

    #[test]
    fn category_parse_is_case_sensitive() {
        assert_eq!("Digital".parse::<Category>().unwrap(), Category::Digital);
        assert!("digital".parse::<Category>().is_err());
    }
}
