//! Domain entities.
//! Framework-agnostic representations of users and projects.

pub mod project;
pub mod user;

pub use project::{Category, NewProject, Project, ProjectPatch, ProjectStatus};
pub use user::{NewUser, Role, User, UserPatch};
