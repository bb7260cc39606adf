//! Trip lifecycle service.
//!
//! Validates and persists status transitions. Every persisted write is
//! a conditional update keyed on the status the caller observed, so
//! concurrent transitions never double-apply: the loser of an accept
//! race gets `TripNoLongerAvailable`, everyone else a `Conflict`.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use ridehub_core::error::AppError;
use ridehub_core::result::AppResult;
use ridehub_entity::trip::{CreateTrip, DriverSnapshot, Trip, TripEvent, TripStatus};
use ridehub_entity::user::UserStatus;

use crate::announcer::TripAnnouncer;
use crate::notifier::LifecycleNotifier;
use crate::store::{TripStore, UserDirectory};

/// Drives trips through their status state machine.
#[derive(Clone)]
pub struct TripLifecycle {
    trips: Arc<dyn TripStore>,
    users: Arc<dyn UserDirectory>,
    notifier: LifecycleNotifier,
    announcer: TripAnnouncer,
}

impl TripLifecycle {
    /// Create a new lifecycle service.
    pub fn new(
        trips: Arc<dyn TripStore>,
        users: Arc<dyn UserDirectory>,
        notifier: LifecycleNotifier,
        announcer: TripAnnouncer,
    ) -> Self {
        Self {
            trips,
            users,
            notifier,
            announcer,
        }
    }

    /// Create a trip in `waiting` status and start announcing it to
    /// drivers. The announcement loop runs its first pass immediately.
    pub async fn create(&self, req: CreateTrip) -> AppResult<Trip> {
        req.validate()?;
        let trip = self.trips.create(&req).await?;
        self.announcer.start(trip.id);
        Ok(trip)
    }

    /// Fetch a trip by ID.
    pub async fn get(&self, trip_id: Uuid) -> AppResult<Trip> {
        self.trips
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trip not found"))
    }

    /// Move a trip to `target` status.
    ///
    /// `acting_driver_id` is required for the accept transition and
    /// ignored otherwise. The returned trip reflects the persisted
    /// post-transition state.
    pub async fn transition(
        &self,
        trip_id: Uuid,
        target: TripStatus,
        acting_driver_id: Option<Uuid>,
    ) -> AppResult<Trip> {
        let trip = self.get(trip_id).await?;
        let previous = trip.status;

        if !previous.can_transition_to(target) {
            return Err(AppError::invalid_transition(
                previous.wire_name(),
                target.wire_name(),
            ));
        }

        let updated = if target == TripStatus::DriverAccepted {
            self.accept(&trip, acting_driver_id).await?
        } else {
            self.trips
                .update_status(trip_id, previous, target)
                .await?
                .ok_or_else(|| AppError::conflict("Trip was modified concurrently"))?
        };

        if previous == TripStatus::Waiting {
            self.announcer.stop(trip_id);
        }

        // The transition is committed; a notification failure must not
        // roll it back or surface to the caller.
        let event = TripEvent::new(updated.clone(), previous, target);
        if let Err(err) = self.notifier.notify(&event).await {
            warn!(trip_id = %trip_id, error = %err, "Failed to notify trip transition");
        }

        Ok(updated)
    }

    /// Validate the accepting driver and run the conditional accept.
    async fn accept(&self, trip: &Trip, acting_driver_id: Option<Uuid>) -> AppResult<Trip> {
        let driver_id = acting_driver_id
            .ok_or_else(|| AppError::validation("driverId is required to accept a trip"))?;
        let driver = self
            .users
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::not_found("Driver not found"))?;
        if !driver.is_driver() {
            return Err(AppError::validation("Only drivers can accept trips"));
        }
        if driver.status != UserStatus::Active {
            return Err(AppError::validation("Driver account is not active"));
        }

        let snapshot = DriverSnapshot {
            driver_id: driver.id,
            name: driver.name.clone(),
            phone: driver.phone.clone(),
            vehicle: driver.vehicle_description(),
            rating: driver.rating,
        };
        self.trips
            .accept(trip.id, &snapshot)
            .await?
            .ok_or_else(|| {
                AppError::trip_no_longer_available("Trip has already been taken by another driver")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::AvailabilityResolver;
    use crate::fanout::FanoutDispatcher;
    use crate::testutil::{
        make_driver, make_trip, InMemoryNotifications, InMemoryTrips, InMemoryUsers,
        RecordingGateway,
    };
    use ridehub_core::config::dispatch::DispatchConfig;
    use ridehub_core::config::push::PushConfig;
    use ridehub_core::error::ErrorKind;
    use ridehub_entity::user::UserRole;

    struct Harness {
        trips: Arc<InMemoryTrips>,
        users: Arc<InMemoryUsers>,
        notifications: Arc<InMemoryNotifications>,
        gateway: Arc<RecordingGateway>,
        announcer: TripAnnouncer,
        lifecycle: TripLifecycle,
    }

    fn harness() -> Harness {
        let trips = Arc::new(InMemoryTrips::default());
        let users = Arc::new(InMemoryUsers::default());
        let notifications = Arc::new(InMemoryNotifications::default());
        let gateway = Arc::new(RecordingGateway::default());
        let push_config = PushConfig {
            gateway_url: "http://localhost:9/send".to_string(),
            server_key: "test-key".to_string(),
            request_timeout_seconds: 1,
            send_silent_copy: false,
            fallback_to_single_sends: false,
        };
        let dispatch_config = DispatchConfig::default();
        let availability = AvailabilityResolver::new(
            trips.clone(),
            users.clone(),
            dispatch_config.clone(),
        );
        let fanout = FanoutDispatcher::new(
            availability,
            notifications.clone(),
            users.clone(),
            gateway.clone(),
            push_config.clone(),
        );
        let announcer = TripAnnouncer::new(trips.clone(), fanout, &dispatch_config);
        let notifier = LifecycleNotifier::new(
            notifications.clone(),
            users.clone(),
            gateway.clone(),
            push_config,
        );
        let lifecycle = TripLifecycle::new(
            trips.clone(),
            users.clone(),
            notifier,
            announcer.clone(),
        );
        Harness {
            trips,
            users,
            notifications,
            gateway,
            announcer,
            lifecycle,
        }
    }

    fn create_request(rider_region: &str) -> CreateTrip {
        let trip = make_trip();
        CreateTrip {
            rider_id: trip.rider_id,
            rider_name: trip.rider_name,
            rider_phone: trip.rider_phone,
            rider_region: rider_region.to_string(),
            pickup_location: trip.pickup_location,
            pickup_lat: trip.pickup_lat,
            pickup_lng: trip.pickup_lng,
            dropoff_location: trip.dropoff_location,
            dropoff_lat: trip.dropoff_lat,
            dropoff_lng: trip.dropoff_lng,
            price: trip.price,
            distance_km: trip.distance_km,
            trip_class: trip.trip_class,
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_starts_announcing() {
        let h = harness();
        let driver = make_driver("central", Some("tok"));
        h.users.insert(driver.clone());

        let trip = h.lifecycle.create(create_request("central")).await.unwrap();
        settle().await;

        assert_eq!(trip.status, TripStatus::Waiting);
        assert!(h.announcer.is_running(trip.id));
        assert_eq!(h.notifications.count_for_user(driver.id), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_coordinates() {
        let h = harness();
        let mut req = create_request("central");
        req.pickup_lat = 0.0;
        req.pickup_lng = 0.0;
        let err = h.lifecycle.create(req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_happy_path_walk() {
        let h = harness();
        let driver = make_driver("central", Some("tok"));
        h.users.insert(driver.clone());
        let trip = h.lifecycle.create(create_request("central")).await.unwrap();
        settle().await;

        let accepted = h
            .lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, Some(driver.id))
            .await
            .unwrap();
        assert_eq!(accepted.status, TripStatus::DriverAccepted);
        assert_eq!(accepted.driver_id, Some(driver.id));
        assert_eq!(accepted.driver_name.as_deref(), Some("Driver"));
        assert_eq!(accepted.driver_vehicle.as_deref(), Some("sedan (12-345)"));
        assert!(accepted.accepted_at.is_some());

        for target in [
            TripStatus::DriverInWay,
            TripStatus::DriverArrived,
            TripStatus::UserPickedUp,
            TripStatus::DriverInProgress,
            TripStatus::TripCompleted,
        ] {
            let updated = h.lifecycle.transition(trip.id, target, None).await.unwrap();
            assert_eq!(updated.status, target);
        }

        let done = h.lifecycle.get(trip.id).await.unwrap();
        assert!(done.completed_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipping_a_status_is_rejected() {
        let h = harness();
        let trip = make_trip();
        h.trips.insert(trip.clone());

        let err = h
            .lifecycle
            .transition(trip.id, TripStatus::UserPickedUp, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
        assert!(err.message.contains("WAITING"));
        assert!(err.message.contains("USER_PICKED_UP"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_trips_reject_all_transitions() {
        let h = harness();
        for terminal in [TripStatus::TripCompleted, TripStatus::TripCancelled] {
            let mut trip = make_trip();
            trip.status = terminal;
            h.trips.insert(trip.clone());

            for target in TripStatus::all() {
                let err = h
                    .lifecycle
                    .transition(trip.id, *target, None)
                    .await
                    .unwrap_err();
                assert_eq!(err.kind, ErrorKind::InvalidTransition);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_allowed_from_every_active_status() {
        let h = harness();
        for status in TripStatus::active_set() {
            let mut trip = make_trip();
            trip.status = *status;
            h.trips.insert(trip.clone());

            let cancelled = h
                .lifecycle
                .transition(trip.id, TripStatus::TripCancelled, None)
                .await
                .unwrap();
            assert_eq!(cancelled.status, TripStatus::TripCancelled);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_accept_requires_driver_id() {
        let h = harness();
        let trip = make_trip();
        h.trips.insert(trip.clone());

        let err = h
            .lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_riders_cannot_accept() {
        let h = harness();
        let mut rider = make_driver("central", Some("tok"));
        rider.role = UserRole::Rider;
        h.users.insert(rider.clone());
        let trip = make_trip();
        h.trips.insert(trip.clone());

        let err = h
            .lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, Some(rider.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspended_driver_cannot_accept() {
        let h = harness();
        let mut driver = make_driver("central", Some("tok"));
        driver.status = UserStatus::Suspended;
        h.users.insert(driver.clone());
        let trip = make_trip();
        h.trips.insert(trip.clone());

        let err = h
            .lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, Some(driver.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_accept_has_exactly_one_winner() {
        let h = harness();
        let a = make_driver("central", Some("tok-a"));
        let b = make_driver("central", Some("tok-b"));
        h.users.insert(a.clone());
        h.users.insert(b.clone());
        let trip = make_trip();
        h.trips.insert(trip.clone());

        let (ra, rb) = tokio::join!(
            h.lifecycle
                .transition(trip.id, TripStatus::DriverAccepted, Some(a.id)),
            h.lifecycle
                .transition(trip.id, TripStatus::DriverAccepted, Some(b.id)),
        );

        let (winner, loser) = match (&ra, &rb) {
            (Ok(_), Err(_)) => (ra.unwrap(), rb.unwrap_err()),
            (Err(_), Ok(_)) => (rb.unwrap(), ra.unwrap_err()),
            _ => panic!("Expected exactly one accept to win"),
        };
        assert_eq!(winner.status, TripStatus::DriverAccepted);
        assert!(matches!(
            loser.kind,
            ErrorKind::TripNoLongerAvailable | ErrorKind::InvalidTransition
        ));

        let stored = h.trips.get(trip.id).unwrap();
        assert_eq!(stored.driver_id, Some(winner.driver_id.unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_accept_stops_announcer() {
        let h = harness();
        let driver = make_driver("central", Some("tok"));
        h.users.insert(driver.clone());
        let trip = h.lifecycle.create(create_request("central")).await.unwrap();
        settle().await;
        assert!(h.announcer.is_running(trip.id));

        h.lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, Some(driver.id))
            .await
            .unwrap();
        settle().await;
        assert!(!h.announcer.is_running(trip.id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting_stops_announcer() {
        let h = harness();
        let trip = h.lifecycle.create(create_request("central")).await.unwrap();
        settle().await;
        assert!(h.announcer.is_running(trip.id));

        h.lifecycle
            .transition(trip.id, TripStatus::TripCancelled, None)
            .await
            .unwrap();
        settle().await;
        assert!(!h.announcer.is_running(trip.id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_failure_does_not_fail_the_transition() {
        let h = harness();
        let driver = make_driver("central", Some("tok"));
        h.users.insert(driver.clone());
        let trip = make_trip();
        h.trips.insert(trip.clone());
        h.gateway.set_fail_transport(true);

        let accepted = h
            .lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, Some(driver.id))
            .await
            .unwrap();
        assert_eq!(accepted.status, TripStatus::DriverAccepted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_notifies_the_rider() {
        let h = harness();
        let rider = {
            let mut u = make_driver("central", Some("tok-rider"));
            u.role = UserRole::Rider;
            u
        };
        let driver = make_driver("central", Some("tok-driver"));
        h.users.insert(rider.clone());
        h.users.insert(driver.clone());

        let mut trip = make_trip();
        trip.rider_id = rider.id;
        h.trips.insert(trip.clone());

        h.lifecycle
            .transition(trip.id, TripStatus::DriverAccepted, Some(driver.id))
            .await
            .unwrap();

        assert_eq!(h.notifications.count_for_user(rider.id), 1);
        let row = &h.notifications.all()[0];
        assert_eq!(row.title, "Driver Accepted");
        assert_eq!(row.trip_id, Some(trip.id));
    }

    #[tokio::test]
    async fn test_get_unknown_trip_is_not_found() {
        let h = harness();
        let err = h.lifecycle.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
