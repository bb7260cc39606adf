//! Unified application error types for RideHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource (trip, driver, notification) was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// The requested trip status is not reachable from the current one.
    InvalidTransition,
    /// Lost a race updating a trip — it is no longer in the expected status.
    TripNoLongerAvailable,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// Push delivery to one or more device tokens failed.
    PushDelivery,
    /// The push gateway itself was unreachable.
    PushTransport,
    /// A database error occurred.
    Database,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidTransition => write!(f, "INVALID_TRANSITION"),
            Self::TripNoLongerAvailable => write!(f, "TRIP_NO_LONGER_AVAILABLE"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::PushDelivery => write!(f, "PUSH_DELIVERY"),
            Self::PushTransport => write!(f, "PUSH_TRANSPORT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error used throughout RideHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-transition error naming the offending statuses.
    pub fn invalid_transition(current: impl fmt::Display, requested: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InvalidTransition,
            format!("Cannot transition trip from '{current}' to '{requested}'"),
        )
    }

    /// Create a trip-no-longer-available error (lost a concurrent update race).
    pub fn trip_no_longer_available(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TripNoLongerAvailable, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a per-token push delivery error.
    pub fn push_delivery(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PushDelivery, message)
    }

    /// Create a push-transport error (gateway unreachable).
    pub fn push_transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PushTransport, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_names_both_statuses() {
        let err = AppError::invalid_transition("waiting", "trip_completed");
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
        assert!(err.message.contains("waiting"));
        assert!(err.message.contains("trip_completed"));
    }

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::not_found("Trip not found");
        assert_eq!(err.to_string(), "NOT_FOUND: Trip not found");
    }
}
