//! Trip repository implementation.
//!
//! Status-changing updates are conditional on the expected previous
//! status (`WHERE id = $1 AND status = $2`), so two concurrent
//! transitions on the same trip can never both succeed: the loser
//! matches zero rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ridehub_core::error::{AppError, ErrorKind};
use ridehub_core::result::AppResult;
use ridehub_entity::trip::{CreateTrip, DriverSnapshot, Trip, TripStatus};

/// Repository for trip persistence and conditional status updates.
#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    /// Create a new trip repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new trip in `waiting` status.
    pub async fn create(&self, req: &CreateTrip) -> AppResult<Trip> {
        sqlx::query_as::<_, Trip>(
            "INSERT INTO trips (rider_id, rider_name, rider_phone, rider_region, \
             pickup_location, pickup_lat, pickup_lng, dropoff_location, dropoff_lat, dropoff_lng, \
             price, distance_km, trip_class) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(req.rider_id)
        .bind(&req.rider_name)
        .bind(&req.rider_phone)
        .bind(&req.rider_region)
        .bind(&req.pickup_location)
        .bind(req.pickup_lat)
        .bind(req.pickup_lng)
        .bind(&req.dropoff_location)
        .bind(req.dropoff_lat)
        .bind(req.dropoff_lng)
        .bind(req.price)
        .bind(req.distance_km)
        .bind(&req.trip_class)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create trip", e))
    }

    /// Fetch a trip by its ID.
    pub async fn find_by_id(&self, trip_id: Uuid) -> AppResult<Option<Trip>> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch trip", e))
    }

    /// Conditionally move a trip from `expected` to `target`.
    ///
    /// Stamps `completed_at` when entering the completed status. Returns
    /// `None` when the trip was not in `expected` anymore (the caller
    /// lost a race or the trip is gone).
    pub async fn update_status(
        &self,
        trip_id: Uuid,
        expected: TripStatus,
        target: TripStatus,
    ) -> AppResult<Option<Trip>> {
        sqlx::query_as::<_, Trip>(
            "UPDATE trips SET status = $3, \
             completed_at = CASE WHEN $3 = 'trip_completed'::trip_status THEN NOW() ELSE completed_at END \
             WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(trip_id)
        .bind(expected)
        .bind(target)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update trip status", e))
    }

    /// Conditionally accept a `waiting` trip, copying the driver snapshot
    /// onto it atomically with the status change.
    ///
    /// Returns `None` when the trip is no longer `waiting` — exactly one
    /// of two racing drivers gets the row.
    pub async fn accept(&self, trip_id: Uuid, driver: &DriverSnapshot) -> AppResult<Option<Trip>> {
        sqlx::query_as::<_, Trip>(
            "UPDATE trips SET status = 'driver_accepted', driver_id = $2, driver_name = $3, \
             driver_phone = $4, driver_vehicle = $5, driver_rating = $6, accepted_at = NOW() \
             WHERE id = $1 AND status = 'waiting' RETURNING *",
        )
        .bind(trip_id)
        .bind(driver.driver_id)
        .bind(&driver.name)
        .bind(&driver.phone)
        .bind(&driver.vehicle)
        .bind(driver.rating)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to accept trip", e))
    }

    /// Count trips in an active status held by a driver.
    pub async fn count_active_for_driver(&self, driver_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM trips WHERE driver_id = $1 AND status IN \
             ('driver_accepted', 'driver_in_way', 'driver_arrived', 'user_picked_up', 'driver_in_progress')",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count active trips", e))
    }

    /// List all trips still in `waiting` status (announcer rehydration).
    pub async fn find_waiting(&self) -> AppResult<Vec<Trip>> {
        sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE status = 'waiting' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list waiting trips", e))
    }

    /// List `waiting` trips created before `cutoff` (stale-trip sweep).
    pub async fn find_stale_waiting(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Trip>> {
        sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE status = 'waiting' AND created_at < $1 ORDER BY created_at",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list stale trips", e))
    }
}
