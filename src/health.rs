use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub dependencies: HashMap<String, DependencyStatus>,
}

impl HealthResponse {
    pub fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy { status: String, latency_ms: u64 },
    Unhealthy { status: String, error: String },
}

impl DependencyStatus {
    fn healthy(start: Instant) -> Self {
        DependencyStatus::Healthy {
            status: "healthy".to_string(),
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn unhealthy(error: impl Into<String>) -> Self {
        DependencyStatus::Unhealthy {
            status: "unhealthy".to_string(),
            error: error.into(),
        }
    }
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> DependencyStatus;
}

pub struct PostgresChecker {
    pool: sqlx::PgPool,
}

impl PostgresChecker {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependencyChecker for PostgresChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => DependencyStatus::healthy(start),
            Err(e) => DependencyStatus::unhealthy(e.to_string()),
        }
    }
}

/// Verifies the upload directory exists and is a directory.
pub struct UploadDirChecker {
    dir: PathBuf,
}

impl UploadDirChecker {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DependencyChecker for UploadDirChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => DependencyStatus::healthy(start),
            Ok(_) => DependencyStatus::unhealthy(format!("{} is not a directory", self.dir.display())),
            Err(e) => DependencyStatus::unhealthy(e.to_string()),
        }
    }
}

struct Registered {
    name: String,
    critical: bool,
    checker: Arc<dyn DependencyChecker>,
}

/// Runs every registered dependency check concurrently, each bounded by a timeout.
pub struct HealthMonitor {
    checks: Vec<Registered>,
    start_time: Instant,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// A failing critical dependency makes the service unhealthy; others only degrade it.
    pub fn with_check(
        mut self,
        name: impl Into<String>,
        critical: bool,
        checker: Arc<dyn DependencyChecker>,
    ) -> Self {
        self.checks.push(Registered {
            name: name.into(),
            critical,
            checker,
        });
        self
    }

    pub async fn check(&self) -> HealthResponse {
        let results = run_checks(&self.checks).await;

        let mut dependencies = HashMap::new();
        let mut has_critical_failure = false;
        let mut has_non_critical_failure = false;

        for (registered, status) in self.checks.iter().zip(results) {
            if matches!(status, DependencyStatus::Unhealthy { .. }) {
                if registered.critical {
                    has_critical_failure = true;
                } else {
                    has_non_critical_failure = true;
                }
            }
            dependencies.insert(registered.name.clone(), status);
        }

        let status = if has_critical_failure {
            "unhealthy"
        } else if has_non_critical_failure {
            "degraded"
        } else {
            "healthy"
        };

        HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            dependencies,
        }
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_checks(checks: &[Registered]) -> Vec<DependencyStatus> {
    let mut set = tokio::task::JoinSet::new();
    for (index, registered) in checks.iter().enumerate() {
        let checker = registered.checker.clone();
        set.spawn(async move {
            let status = timeout(CHECK_TIMEOUT, checker.check())
                .await
                .unwrap_or_else(|_| DependencyStatus::unhealthy("timeout"));
            (index, status)
        });
    }

    let mut results: Vec<Option<DependencyStatus>> = checks.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, status)) => results[index] = Some(status),
            Err(e) => tracing::error!("Health check task failed: {}", e),
        }
    }

    results
        .into_iter()
        .map(|r| r.unwrap_or_else(|| DependencyStatus::unhealthy("check panicked")))
        .collect()
}
