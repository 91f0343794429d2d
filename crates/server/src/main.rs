use std::sync::Arc;

use anyhow::Error as AnyhowError;
use db::{DBService, DatabaseConfig};
use intake::{
    IntakeConfig, IntakeService, Orchestrator, ReferenceRegistry, StoreError, SynonymTable,
};
use parser_client::{ParserClientConfig, ParserClientError};
use server::{AppState, registry_listener, routes};
use sqlx::Error as SqlxError;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum IntakeServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] SqlxError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Parser(#[from] ParserClientError),
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

#[tokio::main]
async fn main() -> Result<(), IntakeServerError> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},intake={level},db={level},parser_client={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string)
        .map_err(|e| anyhow::anyhow!("Failed to create tracing filter: {}", e))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let db_config = DatabaseConfig::from_env();
    tracing::info!("Connecting to {:?}", db_config);
    let db = Arc::new(DBService::new(&db_config).await?);

    let intake_config = IntakeConfig::from_env();
    let registry = ReferenceRegistry::load(db.as_ref()).await?;
    {
        let snapshot = registry.snapshot().await;
        tracing::info!(
            "Registry loaded: {} users, {} projects",
            snapshot.user_count(),
            snapshot.project_count()
        );
    }

    let parser = parser_client::connect(&ParserClientConfig::from_env()).await?;

    let orchestrator = Orchestrator::new(SynonymTable::default(), intake_config.deadline_policy);
    tracing::info!("Deadline policy: {}", orchestrator.deadline_policy());

    let service = Arc::new(IntakeService::new(
        Arc::new(parser),
        db.clone(),
        Arc::new(registry),
        orchestrator,
    ));

    if intake_config.listen_for_registry_changes {
        tokio::spawn(registry_listener::run(db.pool.clone(), service.clone()));
    } else {
        tracing::info!("Registry change listener disabled (set INTAKE_LISTEN_REGISTRY=true to enable)");
    }

    let app_router = routes::router(AppState::new(service));

    let port = std::env::var("BACKEND_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|s| s.trim().parse::<u16>().ok())
        .unwrap_or_else(|| {
            tracing::info!("No PORT environment variable set, using {}", DEFAULT_PORT);
            DEFAULT_PORT
        });

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("Server running on http://{host}:{actual_port}");

    axum::serve(listener, app_router).await?;
    Ok(())
}
