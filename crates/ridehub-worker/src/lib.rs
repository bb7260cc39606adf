//! Scheduled maintenance tasks for RideHub.
//!
//! This crate provides:
//! - A cron scheduler wiring periodic maintenance to the job handlers
//! - Built-in jobs for notification cleanup and stale-trip sweeping

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
