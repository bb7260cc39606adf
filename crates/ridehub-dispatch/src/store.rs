//! Persistence seams for the dispatch engine.
//!
//! The engine talks to the trip store through these traits; the sqlx
//! repositories implement them for production, and in-memory fakes
//! implement them in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ridehub_core::result::AppResult;
use ridehub_database::repositories::notification::NotificationRepository;
use ridehub_database::repositories::trip::TripRepository;
use ridehub_database::repositories::user::UserRepository;
use ridehub_entity::notification::{NewNotification, Notification};
use ridehub_entity::trip::{CreateTrip, DriverSnapshot, Trip, TripStatus};
use ridehub_entity::user::{DeviceToken, User};

/// Durable trip storage with conditional status updates.
#[async_trait]
pub trait TripStore: Send + Sync + 'static {
    /// Insert a new trip in `waiting` status.
    async fn create(&self, req: &CreateTrip) -> AppResult<Trip>;

    /// Fetch a trip by ID.
    async fn find_by_id(&self, trip_id: Uuid) -> AppResult<Option<Trip>>;

    /// Conditionally move a trip from `expected` to `target`; `None`
    /// when the trip was not in `expected` anymore.
    async fn update_status(
        &self,
        trip_id: Uuid,
        expected: TripStatus,
        target: TripStatus,
    ) -> AppResult<Option<Trip>>;

    /// Conditionally accept a `waiting` trip, copying the driver
    /// snapshot atomically with the status change; `None` when the trip
    /// is no longer `waiting`.
    async fn accept(&self, trip_id: Uuid, driver: &DriverSnapshot) -> AppResult<Option<Trip>>;

    /// Count trips in an active status held by a driver.
    async fn count_active_for_driver(&self, driver_id: Uuid) -> AppResult<i64>;

    /// List all trips still in `waiting` status.
    async fn find_waiting(&self) -> AppResult<Vec<Trip>>;

    /// List `waiting` trips created before `cutoff`.
    async fn find_stale_waiting(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Trip>>;
}

/// User lookup and device-token maintenance.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Fetch a user by ID.
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// List active drivers in the given regions.
    async fn find_active_drivers_in_regions(&self, regions: &[String]) -> AppResult<Vec<User>>;

    /// Register or refresh a user's device token, clearing any other
    /// holder of the same token.
    async fn register_device_token(&self, user_id: Uuid, device: &DeviceToken) -> AppResult<()>;

    /// Clear a stored device token wherever it appears.
    async fn clear_device_token(&self, token: &str) -> AppResult<u64>;
}

/// Durable notification rows with idempotent inserts.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Insert a notification row; `None` when the dedup key already
    /// exists (the recipient was already notified of this event).
    async fn create(&self, new: &NewNotification) -> AppResult<Option<Notification>>;
}

#[async_trait]
impl TripStore for TripRepository {
    async fn create(&self, req: &CreateTrip) -> AppResult<Trip> {
        TripRepository::create(self, req).await
    }

    async fn find_by_id(&self, trip_id: Uuid) -> AppResult<Option<Trip>> {
        TripRepository::find_by_id(self, trip_id).await
    }

    async fn update_status(
        &self,
        trip_id: Uuid,
        expected: TripStatus,
        target: TripStatus,
    ) -> AppResult<Option<Trip>> {
        TripRepository::update_status(self, trip_id, expected, target).await
    }

    async fn accept(&self, trip_id: Uuid, driver: &DriverSnapshot) -> AppResult<Option<Trip>> {
        TripRepository::accept(self, trip_id, driver).await
    }

    async fn count_active_for_driver(&self, driver_id: Uuid) -> AppResult<i64> {
        TripRepository::count_active_for_driver(self, driver_id).await
    }

    async fn find_waiting(&self) -> AppResult<Vec<Trip>> {
        TripRepository::find_waiting(self).await
    }

    async fn find_stale_waiting(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Trip>> {
        TripRepository::find_stale_waiting(self, cutoff).await
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(self, user_id).await
    }

    async fn find_active_drivers_in_regions(&self, regions: &[String]) -> AppResult<Vec<User>> {
        UserRepository::find_active_drivers_in_regions(self, regions).await
    }

    async fn register_device_token(&self, user_id: Uuid, device: &DeviceToken) -> AppResult<()> {
        UserRepository::register_device_token(self, user_id, device).await
    }

    async fn clear_device_token(&self, token: &str) -> AppResult<u64> {
        UserRepository::clear_device_token(self, token).await
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, new: &NewNotification) -> AppResult<Option<Notification>> {
        NotificationRepository::create(self, new).await
    }
}
