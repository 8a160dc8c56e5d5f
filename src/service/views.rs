//! Boundary views of the domain entities

use medifleet_shared::{Drone, DroneId, DroneModel, DroneState, Medication, MedicationId};
use serde::Serialize;

/// A drone as presented to the delivery boundary, with its computed payload
/// weight
#[derive(Debug, Clone, Serialize)]
pub struct DroneView {
    pub id: DroneId,
    pub serial_number: String,
    pub model: DroneModel,
    pub weight_limit: f64,
    pub battery_capacity: f64,
    pub state: DroneState,
    pub current_weight: f64,
}

impl DroneView {
    pub fn new(drone: &Drone, current_weight: f64) -> Self {
        Self {
            id: drone.id(),
            serial_number: drone.serial_number().to_string(),
            model: drone.model(),
            weight_limit: drone.weight_limit(),
            battery_capacity: drone.battery_capacity(),
            state: drone.state(),
            current_weight,
        }
    }
}

/// A medication item as presented to the delivery boundary
#[derive(Debug, Clone, Serialize)]
pub struct MedicationView {
    pub id: MedicationId,
    pub name: String,
    pub weight: f64,
    pub code: String,
    pub image_ref: Option<String>,
    pub drone: Option<DroneId>,
}

impl From<&Medication> for MedicationView {
    fn from(medication: &Medication) -> Self {
        Self {
            id: medication.id(),
            name: medication.name().to_string(),
            weight: medication.weight(),
            code: medication.code().to_string(),
            image_ref: medication.image_ref().map(String::from),
            drone: medication.drone(),
        }
    }
}
