//! # ridehub-database
//!
//! PostgreSQL connection management and repository implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
