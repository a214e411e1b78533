pub mod accounts;
pub mod projects;
pub mod uploads;

pub use accounts::AccountService;
pub use projects::ProjectService;
pub use uploads::UploadStore;
