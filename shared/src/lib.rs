//! Medifleet Shared Domain Types
//!
//! This crate provides the domain entities and the drone state machine shared
//! between the fleet service, the battery monitor and any delivery boundary.

pub mod drone;
pub mod error;
pub mod medication;
pub mod state_machine;

pub use drone::{Drone, DroneModel};
pub use error::DomainError;
pub use medication::Medication;
pub use state_machine::DroneState;

/// Unique drone identifier
pub type DroneId = u64;

/// Unique medication identifier
pub type MedicationId = u64;

/// Battery parameters for the fleet
pub mod battery {
    /// Default battery percentage below which loading is disallowed
    pub const DEFAULT_THRESHOLD_PERCENT: f64 = 25.0;

    /// Default interval between battery monitor sweeps
    pub const SWEEP_INTERVAL_MS: u64 = 60_000;
}

/// Hard limits applied when constructing a drone
pub mod limits {
    /// Maximum weight a drone may be rated for, in grams
    pub const MAX_WEIGHT_LIMIT_GRAMS: f64 = 500.0;

    /// Battery capacity is a percentage
    pub const MAX_BATTERY_PERCENT: f64 = 100.0;
}
