use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::adapters::PostgresUserRepository;
use crate::auth::TokenService;
use crate::config::Config;
use crate::services::accounts::{AccountService, Registration};

#[derive(Parser)]
#[command(name = "editorial-cms")]
#[command(about = "Editorial CMS - content API for projects, editors and subscribers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Account management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an administrator, or promote an existing account to admin
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Falls back to the ADMIN_PASSWORD environment variable
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed");
    Ok(())
}

pub async fn handle_create_admin(
    config: &Config,
    name: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;
    crate::db::run_migrations(&pool).await?;

    let tokens = TokenService::new(
        &config.jwt_secret,
        chrono::Duration::hours(config.jwt_expiry_hours),
    );
    let accounts = AccountService::new(
        Arc::new(PostgresUserRepository::new(pool)),
        tokens,
        config.bcrypt_cost,
    );

    let (user, created) = accounts
        .bootstrap_admin(Registration {
            name,
            email,
            password,
        })
        .await?;

    if created {
        println!("✓ Admin {} created ({})", user.email, user.id);
    } else {
        println!("✓ Existing account {} promoted to admin", user.email);
    }
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  JWT Secret: ****");
    println!("  JWT Expiry: {}h", config.jwt_expiry_hours);
    println!("  Bcrypt Cost: {}", config.bcrypt_cost);
    println!("  Upload Dir: {}", config.upload_dir.display());
    println!(
        "  Public Base URL: {}",
        config.public_base_url.as_deref().unwrap_or("(from request)")
    );
    println!("  CORS Origins: {}", config.cors_allowed_origins.join(", "));
    println!("  Max Body: {} bytes", config.max_body_bytes);

    config.validate()?;

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");
    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
