//! Domain error taxonomy
//!
//! Failures are modeled as a closed set of tagged variants rather than opaque
//! faults, so the service layer and any delivery boundary can pattern-match
//! on them directly.

use thiserror::Error;

use crate::state_machine::DroneState;

/// Errors raised by the drone entity and its validation rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// The requested state is not reachable from the current state
    #[error("state transition {from} -> {to} is not allowed")]
    InvalidStateTransition { from: DroneState, to: DroneState },

    /// A transition into LOADING was blocked by the battery threshold
    #[error("battery at {capacity}% is below the {threshold}% required for loading")]
    BatteryTooLow { capacity: f64, threshold: f64 },

    /// Admitting the item would push the drone past its weight limit
    #[error(
        "loading {item_weight}g on top of {current_weight}g would exceed the {weight_limit}g limit"
    )]
    WeightExceeded {
        current_weight: f64,
        item_weight: f64,
        weight_limit: f64,
    },

    /// A field failed validation at construction time
    #[error("invalid {field}: {reason}")]
    ValidationFailed { field: &'static str, reason: String },
}
