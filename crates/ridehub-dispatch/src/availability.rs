//! Driver availability resolution — determines which drivers are
//! eligible to be notified of a new trip.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use ridehub_core::config::dispatch::DispatchConfig;
use ridehub_core::result::AppResult;
use ridehub_entity::trip::Trip;
use ridehub_entity::user::User;

use crate::store::{TripStore, UserDirectory};

/// Resolves candidate drivers for a trip and filters them by
/// availability.
#[derive(Clone)]
pub struct AvailabilityResolver {
    trips: Arc<dyn TripStore>,
    users: Arc<dyn UserDirectory>,
    config: DispatchConfig,
}

impl AvailabilityResolver {
    /// Create a new resolver.
    pub fn new(
        trips: Arc<dyn TripStore>,
        users: Arc<dyn UserDirectory>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            trips,
            users,
            config,
        }
    }

    /// A driver is available iff they hold no trip in an active status.
    ///
    /// Always a fresh store query: the fanout loop relies on this
    /// reflecting the latest persisted state at call time.
    pub async fn is_available(&self, driver_id: Uuid) -> AppResult<bool> {
        let active = self.trips.count_active_for_driver(driver_id).await?;
        Ok(active == 0)
    }

    /// Active drivers matching the trip's rider region, filtered to
    /// availability.
    ///
    /// When no active driver matches in-region and fallback regions are
    /// configured, those are searched instead; with no fallback
    /// configured the candidate set stays empty.
    pub async fn candidate_drivers(&self, trip: &Trip) -> AppResult<Vec<User>> {
        let in_region = vec![trip.rider_region.clone()];
        let mut drivers = self.users.find_active_drivers_in_regions(&in_region).await?;

        if drivers.is_empty() && !self.config.fallback_regions.is_empty() {
            debug!(
                trip_id = %trip.id,
                region = %trip.rider_region,
                "No in-region drivers, broadening to fallback regions"
            );
            drivers = self
                .users
                .find_active_drivers_in_regions(&self.config.fallback_regions)
                .await?;
        }

        let mut candidates = Vec::with_capacity(drivers.len());
        for driver in drivers {
            if self.is_available(driver.id).await? {
                candidates.push(driver);
            }
        }
        Ok(candidates)
    }
}
