//! # ridehub-api
//!
//! HTTP API layer for RideHub built on Axum.
//!
//! Provides the REST endpoints for trips, notifications, device token
//! registration, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
