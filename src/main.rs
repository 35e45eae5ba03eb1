use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hogwarts_school::{config::Config, create_routes, AppState};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::info;

/// Hogwarts school administration backend.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Address to bind, overrides HOST.
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on, overrides PORT.
    #[arg(long)]
    port: Option<u16>,
    /// Directory for avatar files, overrides AVATARS_DIR.
    #[arg(long)]
    avatars_dir: Option<PathBuf>,
    /// Do not apply pending migrations at start-up.
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(avatars_dir) = cli.avatars_dir {
        config.avatars_dir = avatars_dir;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    if !cli.skip_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to apply migrations")?;
    }

    let state = AppState::new(db, config.avatars_dir.clone());
    info!("Avatars are stored in {}", state.avatars.avatars_dir().display());

    // build our application using the routes module
    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
