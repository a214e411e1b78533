use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
    pub upload_dir: PathBuf,
    pub public_base_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub log_request_body: bool,
}

impl Config {
    /// Defaults for everything except the two values that have none.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_base_url: None,
            cors_allowed_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_request_body: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must be set to a non-empty value");
        }

        let mut config = Config::new(database_url, jwt_secret);

        if let Some(port) = var("SERVER_PORT") {
            config.server_port = port.parse().context("SERVER_PORT must be a port number")?;
        }
        if let Some(hours) = var("JWT_EXPIRY_HOURS") {
            config.jwt_expiry_hours = hours
                .parse()
                .context("JWT_EXPIRY_HOURS must be an integer")?;
        }
        if let Some(cost) = var("BCRYPT_COST") {
            config.bcrypt_cost = cost.parse().context("BCRYPT_COST must be an integer")?;
        }
        if let Some(dir) = var("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        config.public_base_url = var("PUBLIC_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        if let Some(origins) = var("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = parse_origins(&origins);
        }
        if let Some(limit) = var("MAX_BODY_BYTES") {
            config.max_body_bytes = limit.parse().context("MAX_BODY_BYTES must be an integer")?;
        }
        config.log_request_body = var("LOG_REQUEST_BODY")
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.is_empty() {
            bail!("DATABASE_URL is empty");
        }
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET is empty");
        }
        if self.server_port == 0 {
            bail!("SERVER_PORT must be greater than 0");
        }
        if self.jwt_expiry_hours <= 0 {
            bail!("JWT_EXPIRY_HOURS must be greater than 0");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }
        if let Some(base) = &self.public_base_url {
            url::Url::parse(base).context("PUBLIC_BASE_URL is not a valid URL")?;
        }
        for origin in &self.cors_allowed_origins {
            url::Url::parse(origin)
                .with_context(|| format!("CORS origin '{}' is not a valid URL", origin))?;
        }
        Ok(())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.trim_end_matches('/').to_string())
        .collect()
}
