//! Storage adapters implementing the ports in `crate::ports`.

pub mod memory;
pub mod postgres_project_repository;
pub mod postgres_user_repository;

pub use memory::{InMemoryProjectRepository, InMemoryUserRepository};
pub use postgres_project_repository::PostgresProjectRepository;
pub use postgres_user_repository::PostgresUserRepository;
