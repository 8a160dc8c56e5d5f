//! Drone Delivery State Machine
//!
//! Defines the delivery lifecycle states and the valid transitions between
//! them. The transition table is plain data evaluated as a lookup, so the
//! lifecycle can be tested and visualized independently of any entity logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle states of a delivery drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroneState {
    /// Parked, empty, ready to start a load cycle
    Idle,
    /// Accepting medication items
    Loading,
    /// Loading finished, cargo on board
    Loaded,
    /// En route to the delivery point
    Delivering,
    /// Cargo dropped off
    Delivered,
    /// Flying back to base
    Returning,
}

impl DroneState {
    /// All states, in lifecycle order
    pub const ALL: [DroneState; 6] = [
        DroneState::Idle,
        DroneState::Loading,
        DroneState::Loaded,
        DroneState::Delivering,
        DroneState::Delivered,
        DroneState::Returning,
    ];
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DroneState::Idle => "IDLE",
            DroneState::Loading => "LOADING",
            DroneState::Loaded => "LOADED",
            DroneState::Delivering => "DELIVERING",
            DroneState::Delivered => "DELIVERED",
            DroneState::Returning => "RETURNING",
        };
        f.write_str(name)
    }
}

/// Error returned when a string does not name a drone state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl fmt::Display for UnknownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown drone state: {}", self.0)
    }
}

impl std::error::Error for UnknownState {}

impl FromStr for DroneState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IDLE" => Ok(DroneState::Idle),
            "LOADING" => Ok(DroneState::Loading),
            "LOADED" => Ok(DroneState::Loaded),
            "DELIVERING" => Ok(DroneState::Delivering),
            "DELIVERED" => Ok(DroneState::Delivered),
            "RETURNING" => Ok(DroneState::Returning),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

/// The states reachable from `state` in a single transition.
///
/// `Returning -> Idle` closes the cycle; there is no terminal state. A load
/// cycle can be abandoned at any point before takeoff (`Loading -> Idle`,
/// `Loaded -> Idle`), and a loaded drone can be reopened for more cargo
/// (`Loaded -> Loading`).
pub fn allowed_next(state: DroneState) -> &'static [DroneState] {
    use DroneState::*;

    match state {
        Idle => &[Loading],
        Loading => &[Loaded, Idle],
        Loaded => &[Delivering, Loading, Idle],
        Delivering => &[Delivered, Returning],
        Delivered => &[Returning],
        Returning => &[Idle],
    }
}

/// Check whether a single-step transition is valid
pub fn is_valid_transition(from: DroneState, to: DroneState) -> bool {
    allowed_next(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_delivery_cycle() {
        use DroneState::*;

        let cycle = [Idle, Loading, Loaded, Delivering, Delivered, Returning, Idle];
        for pair in cycle.windows(2) {
            assert!(
                is_valid_transition(pair[0], pair[1]),
                "expected {} -> {} to be valid",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_no_state_skipping_from_idle() {
        use DroneState::*;

        for to in [Loaded, Delivering, Delivered, Returning] {
            assert!(!is_valid_transition(Idle, to));
        }
    }

    #[test]
    fn test_delivering_cannot_go_idle() {
        assert!(!is_valid_transition(DroneState::Delivering, DroneState::Idle));
    }

    #[test]
    fn test_loaded_can_reopen_for_loading() {
        assert!(is_valid_transition(DroneState::Loaded, DroneState::Loading));
    }

    #[test]
    fn test_self_transitions_are_invalid() {
        for state in DroneState::ALL {
            assert!(!is_valid_transition(state, state));
        }
    }

    #[test]
    fn test_every_state_reachable_from_idle() {
        // Walk the table breadth-first from Idle; the whole lifecycle must be
        // reachable or a drone could never get there.
        let mut reached = vec![DroneState::Idle];
        let mut frontier = vec![DroneState::Idle];
        while let Some(state) = frontier.pop() {
            for &next in allowed_next(state) {
                if !reached.contains(&next) {
                    reached.push(next);
                    frontier.push(next);
                }
            }
        }
        for state in DroneState::ALL {
            assert!(reached.contains(&state), "{state} unreachable from IDLE");
        }
    }

    #[test]
    fn test_state_round_trips_through_strings() {
        for state in DroneState::ALL {
            let parsed: DroneState = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("AIRBORNE".parse::<DroneState>().is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("loading".parse::<DroneState>(), Ok(DroneState::Loading));
    }
}
