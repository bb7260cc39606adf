//! In-memory fakes for the engine's persistence and push seams.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ridehub_core::error::AppError;
use ridehub_core::result::AppResult;
use ridehub_entity::notification::{NewNotification, Notification};
use ridehub_entity::trip::{CreateTrip, DriverSnapshot, Trip, TripStatus};
use ridehub_entity::user::{DeviceToken, User, UserRole, UserStatus};

use crate::push::{MulticastOutcome, PushGateway, PushMessage};
use crate::store::{NotificationStore, TripStore, UserDirectory};

/// A waiting trip in region "central".
pub fn make_trip() -> Trip {
    Trip {
        id: Uuid::new_v4(),
        status: TripStatus::Waiting,
        rider_id: Uuid::new_v4(),
        rider_name: "Rider One".to_string(),
        rider_phone: "+100000000".to_string(),
        rider_region: "central".to_string(),
        pickup_location: "A".to_string(),
        pickup_lat: 35.69,
        pickup_lng: 51.39,
        dropoff_location: "B".to_string(),
        dropoff_lat: 35.75,
        dropoff_lng: 51.41,
        price: 5000,
        distance_km: 4.2,
        trip_class: "economy".to_string(),
        driver_id: None,
        driver_name: None,
        driver_phone: None,
        driver_vehicle: None,
        driver_rating: None,
        created_at: Utc::now(),
        accepted_at: None,
        completed_at: None,
    }
}

/// An active driver with the given region and optional device token.
pub fn make_driver(region: &str, token: Option<&str>) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Driver".to_string(),
        phone: "+100000001".to_string(),
        role: UserRole::Driver,
        status: UserStatus::Active,
        region: region.to_string(),
        device_token: token.map(str::to_string),
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

/// In-memory [`TripStore`] with the same conditional-update semantics
/// as the SQL repository.
#[derive(Debug, Default)]
pub struct InMemoryTrips {
    trips: Mutex<HashMap<Uuid, Trip>>,
}

impl InMemoryTrips {
    pub fn insert(&self, trip: Trip) {
        self.trips.lock().unwrap().insert(trip.id, trip);
    }

    pub fn get(&self, trip_id: Uuid) -> Option<Trip> {
        self.trips.lock().unwrap().get(&trip_id).cloned()
    }
}

#[async_trait]
impl TripStore for InMemoryTrips {
    async fn create(&self, req: &CreateTrip) -> AppResult<Trip> {
        let mut trip = make_trip();
        trip.rider_id = req.rider_id;
        trip.rider_name = req.rider_name.clone();
        trip.rider_phone = req.rider_phone.clone();
        trip.rider_region = req.rider_region.clone();
        trip.pickup_location = req.pickup_location.clone();
        trip.pickup_lat = req.pickup_lat;
        trip.pickup_lng = req.pickup_lng;
        trip.dropoff_location = req.dropoff_location.clone();
        trip.dropoff_lat = req.dropoff_lat;
        trip.dropoff_lng = req.dropoff_lng;
        trip.price = req.price;
        trip.distance_km = req.distance_km;
        trip.trip_class = req.trip_class.clone();
        self.insert(trip.clone());
        Ok(trip)
    }

    async fn find_by_id(&self, trip_id: Uuid) -> AppResult<Option<Trip>> {
        Ok(self.get(trip_id))
    }

    async fn update_status(
        &self,
        trip_id: Uuid,
        expected: TripStatus,
        target: TripStatus,
    ) -> AppResult<Option<Trip>> {
        let mut trips = self.trips.lock().unwrap();
        match trips.get_mut(&trip_id) {
            Some(trip) if trip.status == expected => {
                trip.status = target;
                if target == TripStatus::TripCompleted {
                    trip.completed_at = Some(Utc::now());
                }
                Ok(Some(trip.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn accept(&self, trip_id: Uuid, driver: &DriverSnapshot) -> AppResult<Option<Trip>> {
        let mut trips = self.trips.lock().unwrap();
        match trips.get_mut(&trip_id) {
            Some(trip) if trip.status == TripStatus::Waiting => {
                trip.status = TripStatus::DriverAccepted;
                trip.driver_id = Some(driver.driver_id);
                trip.driver_name = Some(driver.name.clone());
                trip.driver_phone = Some(driver.phone.clone());
                trip.driver_vehicle = Some(driver.vehicle.clone());
                trip.driver_rating = driver.rating;
                trip.accepted_at = Some(Utc::now());
                Ok(Some(trip.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn count_active_for_driver(&self, driver_id: Uuid) -> AppResult<i64> {
        let trips = self.trips.lock().unwrap();
        Ok(trips
            .values()
            .filter(|t| t.driver_id == Some(driver_id) && t.status.is_active())
            .count() as i64)
    }

    async fn find_waiting(&self) -> AppResult<Vec<Trip>> {
        let trips = self.trips.lock().unwrap();
        Ok(trips.values().filter(|t| t.is_waiting()).cloned().collect())
    }

    async fn find_stale_waiting(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Trip>> {
        let trips = self.trips.lock().unwrap();
        Ok(trips
            .values()
            .filter(|t| t.is_waiting() && t.created_at < cutoff)
            .cloned()
            .collect())
    }
}

/// In-memory [`UserDirectory`].
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, user_id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.get(user_id))
    }

    async fn find_active_drivers_in_regions(&self, regions: &[String]) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .filter(|u| {
                u.role == UserRole::Driver
                    && u.status == UserStatus::Active
                    && regions.contains(&u.region)
            })
            .cloned()
            .collect())
    }

    async fn register_device_token(&self, user_id: Uuid, device: &DeviceToken) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        for user in users.values_mut() {
            if user.device_token.as_deref() == Some(device.token.as_str()) && user.id != user_id {
                user.device_token = None;
            }
        }
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.device_token = Some(device.token.clone());
        user.device_platform = device.platform.clone();
        user.app_version = device.app_version.clone();
        Ok(())
    }

    async fn clear_device_token(&self, token: &str) -> AppResult<u64> {
        let mut users = self.users.lock().unwrap();
        let mut cleared = 0;
        for user in users.values_mut() {
            if user.device_token.as_deref() == Some(token) {
                user.device_token = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

/// In-memory [`NotificationStore`] enforcing dedup-key uniqueness.
#[derive(Debug, Default)]
pub struct InMemoryNotifications {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotifications {
    pub fn all(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }

    pub fn count_for_user(&self, user_id: Uuid) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotifications {
    async fn create(&self, new: &NewNotification) -> AppResult<Option<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        let dedup_key = new.dedup_key();
        if let Some(key) = &dedup_key {
            if rows.iter().any(|n| n.dedup_key.as_ref() == Some(key)) {
                return Ok(None);
            }
        }
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            kind: new.kind,
            title: new.title.clone(),
            message: new.message.clone(),
            payload: new.payload.clone(),
            trip_id: new.trip_id,
            dedup_key,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(Some(row))
    }
}

/// A recorded gateway call.
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub tokens: Vec<String>,
    pub message: PushMessage,
}

/// Recording [`PushGateway`] with scriptable failures.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    multicasts: Mutex<Vec<RecordedSend>>,
    singles: Mutex<Vec<RecordedSend>>,
    /// When set, multicast calls fail at the transport level.
    fail_transport: Mutex<bool>,
    /// Tokens the gateway reports as permanently invalid.
    invalid_tokens: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn set_fail_transport(&self, fail: bool) {
        *self.fail_transport.lock().unwrap() = fail;
    }

    pub fn mark_token_invalid(&self, token: &str) {
        self.invalid_tokens.lock().unwrap().push(token.to_string());
    }

    pub fn multicast_calls(&self) -> Vec<RecordedSend> {
        self.multicasts.lock().unwrap().clone()
    }

    pub fn single_calls(&self) -> Vec<RecordedSend> {
        self.singles.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> AppResult<MulticastOutcome> {
        if *self.fail_transport.lock().unwrap() {
            return Err(AppError::push_transport("Gateway unreachable"));
        }
        self.multicasts.lock().unwrap().push(RecordedSend {
            tokens: tokens.to_vec(),
            message: message.clone(),
        });
        let invalid: Vec<String> = {
            let marked = self.invalid_tokens.lock().unwrap();
            tokens.iter().filter(|t| marked.contains(t)).cloned().collect()
        };
        Ok(MulticastOutcome {
            success_count: tokens.len() - invalid.len(),
            failure_count: invalid.len(),
            invalid_tokens: invalid,
        })
    }

    async fn send_single(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        if self
            .invalid_tokens
            .lock()
            .unwrap()
            .contains(&token.to_string())
        {
            return Err(AppError::push_delivery("not a valid registration token"));
        }
        self.singles.lock().unwrap().push(RecordedSend {
            tokens: vec![token.to_string()],
            message: message.clone(),
        });
        Ok(())
    }
}
