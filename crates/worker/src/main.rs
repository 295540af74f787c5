//! `advsync-worker` — the advertising sync daemon.
//!
//! Connects to Postgres, then runs the periodic sync scheduler:
//! one cycle per shop per interval, change detection and history
//! accumulation per campaign.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default | Description                       |
//! |------------------------|----------|---------|-----------------------------------|
//! | `DATABASE_URL`         | yes      | --      | Postgres connection string        |
//! | `MARKETPLACE_API_URL`  | yes      | --      | Advert API origin                 |
//! | `SYNC_INTERVAL_SECS`   | no       | `900`   | Seconds between sync cycles       |
//! | `STATS_INTERVAL_SECS`  | no       | `60`    | Statistics call spacing per shop  |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`    | Per-call HTTP timeout             |
//! | `MAX_RETRY_ATTEMPTS`   | no       | `3`     | Retry budget per upstream call    |

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use advsync_events::{ChangeLogger, EventBus};
use advsync_marketplace::MarketplaceClient;
use advsync_sync::{Orchestrator, SyncConfig, SyncScheduler};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::error!("DATABASE_URL environment variable is required");
        std::process::exit(1);
    });

    let api_url = std::env::var("MARKETPLACE_API_URL").unwrap_or_else(|_| {
        tracing::error!("MARKETPLACE_API_URL environment variable is required");
        std::process::exit(1);
    });

    let config = SyncConfig::from_env();

    let pool = match advsync_db::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Database connection failed");
            std::process::exit(1);
        }
    };

    let api = Arc::new(MarketplaceClient::with_timeout(
        api_url,
        config.request_timeout,
    ));
    let bus = Arc::new(EventBus::default());

    tokio::spawn(ChangeLogger::run(bus.subscribe()));

    let orchestrator = Arc::new(Orchestrator::new(
        pool.clone(),
        api,
        Arc::clone(&bus),
        config.retry.clone(),
        config.stats_interval,
    ));
    let scheduler = SyncScheduler::new(pool, orchestrator, config.sync_interval);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    tracing::info!(
        sync_interval_secs = config.sync_interval.as_secs(),
        stats_interval_secs = config.stats_interval.as_secs(),
        "Starting advsync-worker",
    );

    scheduler.run(cancel).await;

    tracing::info!("Worker stopped");
}
