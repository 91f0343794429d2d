//! Keeps the reference registry in step with the database.
//!
//! Triggers on `users` and `projects` publish the changed table name on
//! [`REGISTRY_NOTIFY_CHANNEL`]; every notification reloads the registry.

use std::{convert::Infallible, sync::Arc, time::Duration};

use db::REGISTRY_NOTIFY_CHANNEL;
use intake::IntakeService;
use sqlx::{PgPool, postgres::PgListener};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Runs until the task is dropped. Connection errors are logged and the
/// listener reconnects after a short delay; notifications sent while it is
/// disconnected are covered by the refresh done on every reconnect.
pub async fn run(pool: PgPool, service: Arc<IntakeService>) {
    loop {
        match listen(&pool, REGISTRY_NOTIFY_CHANNEL, &service).await {
            Ok(never) => match never {},
            Err(e) => tracing::warn!(
                "Registry listener on '{}' failed: {}; reconnecting in {:?}",
                REGISTRY_NOTIFY_CHANNEL,
                e,
                RECONNECT_DELAY
            ),
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn listen(
    pool: &PgPool,
    channel: &str,
    service: &IntakeService,
) -> Result<Infallible, sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(channel).await?;
    tracing::info!("Listening for registry changes on '{}'", channel);

    refresh(service).await;

    loop {
        let notification = listener.recv().await?;
        tracing::debug!(table = notification.payload(), "Registry change notified");
        refresh(service).await;
    }
}

async fn refresh(service: &IntakeService) {
    if let Err(e) = service.refresh_registry().await {
        tracing::warn!("Failed to refresh registry: {}", e);
    }
}
