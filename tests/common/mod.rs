#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use editorial_cms::adapters::{InMemoryProjectRepository, InMemoryUserRepository};
use editorial_cms::config::Config;
use editorial_cms::domain::{Role, User};
use editorial_cms::health::HealthMonitor;
use editorial_cms::services::accounts::Registration;
use editorial_cms::{create_app, AppState};

pub const TEST_SECRET: &str = "test-jwt-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("postgres://unused/cms", TEST_SECRET);
        config.bcrypt_cost = 4;
        config.upload_dir = upload_dir.path().to_path_buf();

        let users = Arc::new(InMemoryUserRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let state = AppState::new(config, users.clone(), projects.clone(), HealthMonitor::new());

        Self {
            router: create_app(state.clone()),
            state,
            users,
            projects,
            upload_dir,
        }
    }

    /// Creates an account with the given role directly through the service layer.
    pub async fn seed_user(&self, name: &str, email: &str, role: Role) -> (User, String) {
        let registration = Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
        };
        let user = self
            .state
            .accounts
            .create_by_admin(registration, Some(role))
            .await
            .unwrap();
        let token = self.state.tokens.issue(&user).unwrap();
        (user, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
