//! # ridehub-dispatch
//!
//! The dispatch engine: trip lifecycle state machine, driver
//! availability resolution, new-trip notification fanout, periodic
//! re-announcement of unclaimed trips, and the push gateway adapter.
//!
//! Persistence and push delivery sit behind the [`store`] and
//! [`push::PushGateway`] seams so the engine can be exercised without a
//! live database or push transport.

pub mod announcer;
pub mod availability;
pub mod fanout;
pub mod lifecycle;
pub mod notifier;
pub mod push;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use announcer::TripAnnouncer;
pub use availability::AvailabilityResolver;
pub use fanout::FanoutDispatcher;
pub use lifecycle::TripLifecycle;
pub use notifier::LifecycleNotifier;
