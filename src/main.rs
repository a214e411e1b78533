use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use editorial_cms::adapters::{PostgresProjectRepository, PostgresUserRepository};
use editorial_cms::cli::{self, Cli, Commands, DbCommands, UserCommands};
use editorial_cms::config::Config;
use editorial_cms::health::{HealthMonitor, PostgresChecker, UploadDirChecker};
use editorial_cms::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Cli::parse();
    let config = Config::from_env()?;

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::User(UserCommands::CreateAdmin {
            name,
            email,
            password,
        }) => cli::handle_create_admin(&config, name, email, password).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(dir = %config.upload_dir.display(), "Upload directory ready");

    let health = HealthMonitor::new()
        .with_check("postgres", true, Arc::new(PostgresChecker::new(pool.clone())))
        .with_check(
            "uploads",
            false,
            Arc::new(UploadDirChecker::new(config.upload_dir.clone())),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState::new(
        config,
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresProjectRepository::new(pool)),
        health,
    );
    let app = create_app(state);

    tracing::info!("listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
