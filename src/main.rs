//! RideHub Server — Taxi Dispatch Backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use ridehub_core::config::AppConfig;
use ridehub_core::error::AppError;
use ridehub_core::result::AppResult;

#[tokio::main]
async fn main() {
    let env = std::env::var("RIDEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting RideHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = ridehub_database::connection::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    ridehub_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Repositories ─────────────────────────────────────
    let trip_repo = Arc::new(ridehub_database::repositories::trip::TripRepository::new(
        db.pool().clone(),
    ));
    let user_repo = Arc::new(ridehub_database::repositories::user::UserRepository::new(
        db.pool().clone(),
    ));
    let notification_repo = Arc::new(
        ridehub_database::repositories::notification::NotificationRepository::new(
            db.pool().clone(),
        ),
    );

    // ── Step 3: Push gateway ─────────────────────────────────────
    let gateway: Arc<dyn ridehub_dispatch::push::PushGateway> = Arc::new(
        ridehub_dispatch::push::HttpPushGateway::new(config.push.clone())?,
    );

    // ── Step 4: Dispatch engine ──────────────────────────────────
    let availability = ridehub_dispatch::AvailabilityResolver::new(
        trip_repo.clone(),
        user_repo.clone(),
        config.dispatch.clone(),
    );
    let fanout = ridehub_dispatch::FanoutDispatcher::new(
        availability,
        notification_repo.clone(),
        user_repo.clone(),
        gateway.clone(),
        config.push.clone(),
    );
    let announcer =
        ridehub_dispatch::TripAnnouncer::new(trip_repo.clone(), fanout, &config.dispatch);
    let notifier = ridehub_dispatch::LifecycleNotifier::new(
        notification_repo.clone(),
        user_repo.clone(),
        gateway,
        config.push.clone(),
    );
    let lifecycle = ridehub_dispatch::TripLifecycle::new(
        trip_repo.clone(),
        user_repo.clone(),
        notifier,
        announcer.clone(),
    );

    // ── Step 5: Rehydrate announcers for waiting trips ───────────
    // Trips created before a restart would otherwise silently stop
    // being announced.
    let waiting = trip_repo.find_waiting().await?;
    for trip in &waiting {
        announcer.start(trip.id);
    }
    if !waiting.is_empty() {
        tracing::info!(count = waiting.len(), "Resumed announcing waiting trips");
    }

    // ── Step 6: Background worker ────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let cleanup = Arc::new(ridehub_worker::jobs::NotificationCleanupJob::new(
            notification_repo.clone(),
            &config.worker,
        ));
        let sweep = Arc::new(ridehub_worker::jobs::StaleTripSweepJob::new(
            trip_repo.clone(),
            lifecycle.clone(),
            &config.worker,
        ));

        let scheduler =
            ridehub_worker::CronScheduler::new(cleanup, sweep, &config.worker).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;

        tracing::info!("Background worker started");
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 7: HTTP server ──────────────────────────────────────
    let app_state = ridehub_api::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        lifecycle,
        announcer: announcer.clone(),
        notification_repo,
        user_repo,
    };

    let app = ridehub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("RideHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Stop background tasks ────────────────────────────
    announcer.shutdown();
    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    db.close().await;

    tracing::info!("RideHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
