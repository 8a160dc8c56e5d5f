//! Medifleet fleet service
//!
//! Use-case orchestration for a medication delivery drone fleet: the fleet
//! repository contract with an in-memory implementation, the drone service,
//! the periodic battery monitor and fixture loading for seeding a store.

pub mod config;
pub mod fixtures;
pub mod monitor;
pub mod service;
pub mod store;

pub use config::FleetConfig;
pub use monitor::{BatteryAlert, BatteryLevel, BatteryMonitor};
pub use service::{DroneService, ErrorKind, ServiceError};
pub use store::{FleetRepository, ImageStore, InMemoryFleet, StoreError};
