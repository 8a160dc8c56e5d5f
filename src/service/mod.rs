//! Drone service layer
//!
//! Orchestrates the use cases on top of the drone entity and the fleet
//! repository, and maps every domain failure into the closed boundary
//! taxonomy before it can escape as a raw fault.

mod drones;
mod views;

pub use drones::DroneService;
pub use views::{DroneView, MedicationView};

use medifleet_shared::{DomainError, DroneState};
use thiserror::Error;

use crate::store::StoreError;

/// Boundary-facing failure taxonomy. Storage errors pass through unchanged;
/// everything else is a structured domain outcome.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Load attempted while the drone is not in the LOADING state
    #[error("the drone state {state} is invalid for this operation")]
    InvalidDroneState { state: DroneState },

    /// A request argument did not have the expected shape
    #[error("malformed request argument: {given:?}")]
    TypeMismatch { given: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stable error kinds for the delivery boundary to match on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidStateTransition,
    BatteryTooLow,
    WeightExceeded,
    TypeMismatch,
    InvalidDroneState,
    ValidationFailed,
    DroneNotFound,
    MedicationNotFound,
    Storage,
}

impl ServiceError {
    /// The kind tag for this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(DomainError::InvalidStateTransition { .. }) => {
                ErrorKind::InvalidStateTransition
            }
            ServiceError::Domain(DomainError::BatteryTooLow { .. }) => ErrorKind::BatteryTooLow,
            ServiceError::Domain(DomainError::WeightExceeded { .. }) => ErrorKind::WeightExceeded,
            ServiceError::Domain(DomainError::ValidationFailed { .. }) => {
                ErrorKind::ValidationFailed
            }
            ServiceError::InvalidDroneState { .. } => ErrorKind::InvalidDroneState,
            ServiceError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ServiceError::Store(StoreError::DroneNotFound(_)) => ErrorKind::DroneNotFound,
            ServiceError::Store(StoreError::MedicationNotFound(_)) => ErrorKind::MedicationNotFound,
            ServiceError::Store(StoreError::Backend(_)) => ErrorKind::Storage,
        }
    }
}
