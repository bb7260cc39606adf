//! Periodic re-announcement of unclaimed trips.
//!
//! Every waiting trip owns one announcer task that re-runs the fanout
//! on a fixed interval until the trip leaves `waiting` or is stopped
//! explicitly. Passes for one trip are strictly sequential: the task
//! awaits each fanout before arming the next tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use ridehub_core::config::dispatch::DispatchConfig;

use crate::fanout::FanoutDispatcher;
use crate::store::TripStore;

struct AnnouncerHandle {
    cancel: watch::Sender<bool>,
    // Distinguishes a loop from any later loop for the same trip id, so
    // an exiting task never deregisters its successor.
    generation: u64,
}

/// Registry of per-trip announcement loops.
#[derive(Clone)]
pub struct TripAnnouncer {
    jobs: Arc<DashMap<Uuid, AnnouncerHandle>>,
    generations: Arc<AtomicU64>,
    trips: Arc<dyn TripStore>,
    fanout: FanoutDispatcher,
    interval: Duration,
}

impl TripAnnouncer {
    /// Create a new announcer registry.
    pub fn new(
        trips: Arc<dyn TripStore>,
        fanout: FanoutDispatcher,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            generations: Arc::new(AtomicU64::new(0)),
            trips,
            fanout,
            interval: Duration::from_secs(config.reannounce_interval_seconds),
        }
    }

    /// Start announcing a trip. The first pass runs immediately, then
    /// every interval until the trip leaves `waiting`.
    ///
    /// Starting an already-announced trip is a no-op; the running loop
    /// keeps its schedule.
    pub fn start(&self, trip_id: Uuid) {
        let (cancel, mut cancelled) = watch::channel(false);
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        match self.jobs.entry(trip_id) {
            Entry::Occupied(_) => {
                debug!(trip_id = %trip_id, "Announcer already running");
                return;
            }
            Entry::Vacant(slot) => {
                slot.insert(AnnouncerHandle { cancel, generation });
            }
        }

        let jobs = self.jobs.clone();
        let trips = self.trips.clone();
        let fanout = self.fanout.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.changed() => {
                        debug!(trip_id = %trip_id, "Announcer stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match trips.find_by_id(trip_id).await {
                            Ok(Some(trip)) if trip.is_waiting() => {
                                if let Err(err) = fanout.notify_new_trip(&trip).await {
                                    warn!(trip_id = %trip_id, error = %err, "Announcement pass failed");
                                }
                            }
                            Ok(_) => {
                                debug!(trip_id = %trip_id, "Trip no longer waiting, announcer exiting");
                                break;
                            }
                            Err(err) => {
                                // Transient store error; retry on the next tick.
                                warn!(trip_id = %trip_id, error = %err, "Announcer trip lookup failed");
                            }
                        }
                    }
                }
            }
            // Only deregister our own handle; a stop-then-start may have
            // replaced it with a newer loop by now.
            jobs.remove_if(&trip_id, |_, handle| handle.generation == generation);
        });
    }

    /// Stop announcing a trip. Returns whether a loop was running.
    /// Safe to call repeatedly and for unknown trip IDs.
    pub fn stop(&self, trip_id: Uuid) -> bool {
        match self.jobs.remove(&trip_id) {
            Some((_, handle)) => {
                // The task may have exited on its own already.
                let _ = handle.cancel.send(true);
                true
            }
            None => false,
        }
    }

    /// Whether a loop is currently registered for this trip.
    pub fn is_running(&self, trip_id: Uuid) -> bool {
        self.jobs.contains_key(&trip_id)
    }

    /// Number of trips currently being announced.
    pub fn active_count(&self) -> usize {
        self.jobs.len()
    }

    /// Cancel every running loop. Used on graceful shutdown.
    pub fn shutdown(&self) {
        for entry in self.jobs.iter() {
            let _ = entry.value().cancel.send(true);
        }
        self.jobs.clear();
    }
}
