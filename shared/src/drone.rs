//! Drone entity
//!
//! Owns the delivery state, battery level and weight limit, and exposes the
//! two guarded mutations of the core: state changes and load admission.
//! Persistence and the medication collection live behind the fleet
//! repository; the entity is handed the current payload weight when it needs
//! it.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::medication::Medication;
use crate::state_machine::{allowed_next, is_valid_transition, DroneState};
use crate::{limits, DroneId};

/// Drone airframe class. Informational only; no rule keys off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroneModel {
    Lightweight,
    Middleweight,
    Cruiserweight,
    Heavyweight,
}

/// A delivery drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    id: DroneId,
    serial_number: String,
    model: DroneModel,
    weight_limit: f64,
    battery_capacity: f64,
    state: DroneState,
}

impl Drone {
    /// Create a drone in the Idle state.
    ///
    /// The weight limit must lie in [0, 500] grams and the battery capacity
    /// in [0, 100] percent.
    pub fn new(
        id: DroneId,
        serial_number: impl Into<String>,
        model: DroneModel,
        weight_limit: f64,
        battery_capacity: f64,
    ) -> Result<Self, DomainError> {
        if !(0.0..=limits::MAX_WEIGHT_LIMIT_GRAMS).contains(&weight_limit) {
            return Err(DomainError::ValidationFailed {
                field: "weight_limit",
                reason: format!(
                    "{weight_limit}g is outside [0, {}]",
                    limits::MAX_WEIGHT_LIMIT_GRAMS
                ),
            });
        }
        if !(0.0..=limits::MAX_BATTERY_PERCENT).contains(&battery_capacity) {
            return Err(DomainError::ValidationFailed {
                field: "battery_capacity",
                reason: format!(
                    "{battery_capacity}% is outside [0, {}]",
                    limits::MAX_BATTERY_PERCENT
                ),
            });
        }

        Ok(Self {
            id,
            serial_number: serial_number.into(),
            model,
            weight_limit,
            battery_capacity,
            state: DroneState::Idle,
        })
    }

    pub fn id(&self) -> DroneId {
        self.id
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn model(&self) -> DroneModel {
        self.model
    }

    /// Maximum payload weight in grams
    pub fn weight_limit(&self) -> f64 {
        self.weight_limit
    }

    /// Battery level as a percentage
    pub fn battery_capacity(&self) -> f64 {
        self.battery_capacity
    }

    pub fn state(&self) -> DroneState {
        self.state
    }

    /// Update the battery level from telemetry. The core never calls this
    /// from a use case; it only reads the value.
    pub fn set_battery_capacity(&mut self, percent: f64) -> Result<(), DomainError> {
        if !(0.0..=limits::MAX_BATTERY_PERCENT).contains(&percent) {
            return Err(DomainError::ValidationFailed {
                field: "battery_capacity",
                reason: format!("{percent}% is outside [0, {}]", limits::MAX_BATTERY_PERCENT),
            });
        }
        self.battery_capacity = percent;
        Ok(())
    }

    /// Request a transition to `new_state`.
    ///
    /// Transition validity is checked before the battery guard: an invalid
    /// transition into Loading reports `InvalidStateTransition` even when the
    /// battery is also below `battery_threshold`. On success the state is
    /// updated and returned; there are no other side effects.
    pub fn request_state_change(
        &mut self,
        new_state: DroneState,
        battery_threshold: f64,
    ) -> Result<DroneState, DomainError> {
        if !is_valid_transition(self.state, new_state) {
            return Err(DomainError::InvalidStateTransition {
                from: self.state,
                to: new_state,
            });
        }

        if new_state == DroneState::Loading && self.battery_capacity < battery_threshold {
            return Err(DomainError::BatteryTooLow {
                capacity: self.battery_capacity,
                threshold: battery_threshold,
            });
        }

        self.state = new_state;
        Ok(self.state)
    }

    /// The states this drone may move to next
    pub fn allowed_next_states(&self) -> &'static [DroneState] {
        allowed_next(self.state)
    }

    /// Check whether `item` can be admitted given the weight already on
    /// board. Strict greater-than: loading exactly to the limit is allowed.
    ///
    /// The state precondition (drone must be Loading) is the caller's job;
    /// this only enforces the weight invariant.
    pub fn check_load(&self, current_weight: f64, item: &Medication) -> Result<(), DomainError> {
        if current_weight + item.weight() > self.weight_limit {
            return Err(DomainError::WeightExceeded {
                current_weight,
                item_weight: item.weight(),
                weight_limit: self.weight_limit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drone(battery: f64) -> Drone {
        Drone::new(1, "DRONE_1", DroneModel::Heavyweight, 500.0, battery).unwrap()
    }

    fn item(weight: f64) -> Medication {
        Medication::new(1, "aspirin", weight, "ASP_755", None).unwrap()
    }

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(drone(100.0).state(), DroneState::Idle);
    }

    #[test]
    fn test_full_cycle() {
        use DroneState::*;

        let mut d = drone(100.0);
        for next in [Loading, Loaded, Delivering, Delivered, Returning, Idle] {
            assert_eq!(d.request_state_change(next, 25.0), Ok(next));
        }
        assert_eq!(d.state(), Idle);
    }

    #[test]
    fn test_invalid_transition_leaves_state_unchanged() {
        let mut d = drone(100.0);
        let err = d
            .request_state_change(DroneState::Delivering, 25.0)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStateTransition {
                from: DroneState::Idle,
                to: DroneState::Delivering,
            }
        );
        assert_eq!(d.state(), DroneState::Idle);
    }

    #[test]
    fn test_loading_blocked_by_low_battery() {
        let mut d = drone(10.0);
        let err = d.request_state_change(DroneState::Loading, 25.0).unwrap_err();
        assert_eq!(
            err,
            DomainError::BatteryTooLow {
                capacity: 10.0,
                threshold: 25.0,
            }
        );
        assert_eq!(d.state(), DroneState::Idle);
    }

    #[test]
    fn test_battery_exactly_at_threshold_allows_loading() {
        let mut d = drone(25.0);
        assert_eq!(
            d.request_state_change(DroneState::Loading, 25.0),
            Ok(DroneState::Loading)
        );
    }

    #[test]
    fn test_invalid_transition_wins_over_low_battery() {
        // Delivering -> Loading is invalid; battery must not be consulted.
        let mut d = drone(5.0);
        d.request_state_change(DroneState::Loading, 0.0).unwrap();
        d.request_state_change(DroneState::Loaded, 0.0).unwrap();
        d.request_state_change(DroneState::Delivering, 0.0).unwrap();

        let err = d.request_state_change(DroneState::Loading, 25.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_load_exactly_to_limit_succeeds() {
        let d = drone(100.0);
        assert!(d.check_load(0.0, &item(500.0)).is_ok());
        assert!(d.check_load(499.0, &item(1.0)).is_ok());
    }

    #[test]
    fn test_load_over_limit_fails() {
        let d = drone(100.0);
        let err = d.check_load(500.0, &item(1.0)).unwrap_err();
        assert_eq!(
            err,
            DomainError::WeightExceeded {
                current_weight: 500.0,
                item_weight: 1.0,
                weight_limit: 500.0,
            }
        );
    }

    #[test]
    fn test_weight_limit_range_enforced() {
        let err = Drone::new(1, "X", DroneModel::Heavyweight, 500.1, 100.0).unwrap_err();
        assert!(matches!(
            err,
            DomainError::ValidationFailed { field: "weight_limit", .. }
        ));
        assert!(Drone::new(1, "X", DroneModel::Lightweight, 0.0, 100.0).is_ok());
    }

    #[test]
    fn test_battery_range_enforced() {
        let err = Drone::new(1, "X", DroneModel::Heavyweight, 500.0, 101.0).unwrap_err();
        assert!(matches!(
            err,
            DomainError::ValidationFailed { field: "battery_capacity", .. }
        ));

        let mut d = drone(50.0);
        assert!(d.set_battery_capacity(-1.0).is_err());
        assert!(d.set_battery_capacity(72.5).is_ok());
        assert_eq!(d.battery_capacity(), 72.5);
    }
}
