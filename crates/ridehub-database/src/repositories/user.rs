//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use ridehub_core::error::{AppError, ErrorKind};
use ridehub_core::result::AppResult;
use ridehub_entity::user::{DeviceToken, User};

/// Repository for user and driver queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a user by ID.
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch user", e))
    }

    /// List active drivers in the given regions.
    pub async fn find_active_drivers_in_regions(&self, regions: &[String]) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'driver' AND status = 'active' AND region = ANY($1)",
        )
        .bind(regions)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list drivers", e))
    }

    /// Register or refresh a user's device token.
    ///
    /// A token is unique across all users at any instant: re-installs
    /// hand the same token to a new login, so any previous holder is
    /// cleared in the same transaction before the new holder is set.
    pub async fn register_device_token(
        &self,
        user_id: Uuid,
        device: &DeviceToken,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("UPDATE users SET device_token = NULL WHERE device_token = $1 AND id <> $2")
            .bind(&device.token)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear duplicate token", e)
            })?;

        sqlx::query(
            "UPDATE users SET device_token = $2, device_platform = $3, app_version = $4, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(&device.token)
        .bind(&device.platform)
        .bind(&device.app_version)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to register device token", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit token registration", e)
        })?;

        Ok(())
    }

    /// Clear a stored device token wherever it appears.
    ///
    /// Used when the push gateway reports the token permanently invalid,
    /// so subsequent fanouts stop targeting it.
    pub async fn clear_device_token(&self, token: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET device_token = NULL, updated_at = NOW() WHERE device_token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear device token", e)
        })?;
        Ok(result.rows_affected())
    }
}
