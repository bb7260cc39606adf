//! Built-in maintenance jobs.

pub mod notification;
pub mod trip;

pub use notification::NotificationCleanupJob;
pub use trip::StaleTripSweepJob;
