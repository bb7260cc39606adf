//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A registered user (rider or driver).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Role (rider, driver, admin).
    pub role: UserRole,
    /// Activation status.
    pub status: UserStatus,
    /// Home region label (resolved externally from coordinates).
    pub region: String,
    /// Push delivery address for the user's current device install.
    /// Unique across all users at any instant.
    pub device_token: Option<String>,
    /// Device platform ("android", "ios").
    pub device_platform: Option<String>,
    /// Installed app version.
    pub app_version: Option<String>,
    /// Vehicle identifier (drivers only).
    pub vehicle_id: Option<String>,
    /// Vehicle type (drivers only).
    pub vehicle_type: Option<String>,
    /// Driving license number (drivers only).
    pub license_no: Option<String>,
    /// Average rating (drivers only).
    pub rating: Option<f64>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether this user is a driver account.
    pub fn is_driver(&self) -> bool {
        self.role == UserRole::Driver
    }

    /// Check whether this user currently holds a device token.
    pub fn has_device_token(&self) -> bool {
        self.device_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    /// Human-readable vehicle description for trip snapshots.
    pub fn vehicle_description(&self) -> String {
        match (&self.vehicle_type, &self.vehicle_id) {
            (Some(ty), Some(id)) => format!("{ty} ({id})"),
            (Some(ty), None) => ty.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A device token registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceToken {
    /// The opaque per-install push delivery address.
    pub token: String,
    /// Device platform ("android", "ios").
    pub platform: Option<String>,
    /// Installed app version.
    pub app_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Driver".to_string(),
            phone: "+100000001".to_string(),
            role: UserRole::Driver,
            status: UserStatus::Active,
            region: "central".to_string(),
            device_token: Some("tok-1".to_string()),
            device_platform: Some("android".to_string()),
            app_version: Some("2.4.0".to_string()),
            vehicle_id: Some("12-345".to_string()),
            vehicle_type: Some("sedan".to_string()),
            license_no: Some("L-99".to_string()),
            rating: Some(4.7),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_device_token() {
        let mut u = driver();
        assert!(u.has_device_token());
        u.device_token = Some(String::new());
        assert!(!u.has_device_token());
        u.device_token = None;
        assert!(!u.has_device_token());
    }

    #[test]
    fn test_vehicle_description() {
        let mut u = driver();
        assert_eq!(u.vehicle_description(), "sedan (12-345)");
        u.vehicle_id = None;
        assert_eq!(u.vehicle_description(), "sedan");
    }
}
