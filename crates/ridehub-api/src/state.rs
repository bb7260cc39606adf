//! Application state shared across all handlers.

use std::sync::Arc;

use ridehub_core::config::AppConfig;
use ridehub_database::connection::DatabasePool;
use ridehub_database::repositories::notification::NotificationRepository;
use ridehub_database::repositories::user::UserRepository;
use ridehub_dispatch::{TripAnnouncer, TripLifecycle};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool handle (health probes).
    pub db: DatabasePool,
    /// Trip lifecycle service.
    pub lifecycle: TripLifecycle,
    /// Re-announcement registry.
    pub announcer: TripAnnouncer,
    /// Notification repository.
    pub notification_repo: Arc<NotificationRepository>,
    /// User repository.
    pub user_repo: Arc<UserRepository>,
}
