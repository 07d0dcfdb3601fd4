//! # Henhouse Events
//!
//! This crate owns the notification log the dashboard reads from: a bounded,
//! newest-first list of system, inventory and production notices, with
//! de-duplicated stock alerts and read tracking.
//!
//! As a Layer 1 crate, it depends only on `core-types`.

// Declare the modules that make up this crate.
pub mod error;
pub mod notifications;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use notifications::NotificationLog;
