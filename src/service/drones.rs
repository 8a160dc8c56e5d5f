//! Drone use cases
//!
//! Each mutating use case is a single read-validate-write sequence performed
//! while holding the drone's repository lock, so the weight sum and state
//! used for admission always come from the same snapshot that the write is
//! applied to.

use std::sync::Arc;

use medifleet_shared::{DroneId, DroneState, MedicationId};
use tracing::{debug, info};

use super::views::{DroneView, MedicationView};
use super::ServiceError;
use crate::store::FleetRepository;

/// Orchestrates the fleet use cases
pub struct DroneService {
    repository: Arc<dyn FleetRepository>,
    battery_threshold: f64,
}

impl DroneService {
    pub fn new(repository: Arc<dyn FleetRepository>, battery_threshold: f64) -> Self {
        Self {
            repository,
            battery_threshold,
        }
    }

    /// Request a state change for a drone.
    ///
    /// `new_state` arrives as a string from the delivery boundary; an
    /// unrecognized name is rejected before any repository access.
    pub async fn set_state(
        &self,
        drone_id: DroneId,
        new_state: &str,
    ) -> Result<DroneState, ServiceError> {
        let requested: DroneState = new_state
            .parse()
            .map_err(|_| ServiceError::TypeMismatch {
                given: new_state.to_string(),
            })?;

        let _guard = self.repository.lock_drone(drone_id).await;

        let mut drone = self.repository.get_drone(drone_id).await?;
        let state = drone.request_state_change(requested, self.battery_threshold)?;
        self.repository.save_drone(&drone).await?;

        info!(drone = drone.serial_number(), %state, "Drone state changed");
        Ok(state)
    }

    /// Load one medication item onto a drone.
    ///
    /// The drone must already be in the LOADING state; the weight invariant
    /// is then enforced against the payload snapshot taken under the lock.
    pub async fn load_medication_item(
        &self,
        drone_id: DroneId,
        medication_id: MedicationId,
    ) -> Result<(), ServiceError> {
        let _guard = self.repository.lock_drone(drone_id).await;

        let drone = self.repository.get_drone(drone_id).await?;
        if drone.state() != DroneState::Loading {
            return Err(ServiceError::InvalidDroneState {
                state: drone.state(),
            });
        }

        let mut item = self.repository.get_medication(medication_id).await?;
        let current_weight = self.payload_weight(drone_id).await?;
        drone.check_load(current_weight, &item)?;

        item.attach_to(drone_id);
        self.repository.save_medication(&item).await?;

        info!(
            drone = drone.serial_number(),
            medication = item.name(),
            weight = item.weight(),
            total = current_weight + item.weight(),
            "Medication item loaded"
        );
        Ok(())
    }

    /// The medication items currently loaded on a drone, stable by id
    pub async fn loaded_medication_items(
        &self,
        drone_id: DroneId,
    ) -> Result<Vec<MedicationView>, ServiceError> {
        // Existence check first so an unknown drone is reported as such
        // rather than as an empty payload.
        self.repository.get_drone(drone_id).await?;

        let items = self.repository.medications_for_drone(drone_id).await?;
        Ok(items.iter().map(MedicationView::from).collect())
    }

    /// Drones currently available for loading: idle or loading, battery at or
    /// above the threshold, and payload strictly under the weight limit.
    pub async fn available_drones_for_load(&self) -> Result<Vec<DroneView>, ServiceError> {
        let mut available = Vec::new();

        for drone in self.repository.list_drones().await? {
            if !matches!(drone.state(), DroneState::Idle | DroneState::Loading) {
                continue;
            }
            if drone.battery_capacity() < self.battery_threshold {
                continue;
            }
            let current_weight = self.payload_weight(drone.id()).await?;
            if current_weight < drone.weight_limit() {
                available.push(DroneView::new(&drone, current_weight));
            }
        }

        debug!(count = available.len(), "Available drones for load");
        Ok(available)
    }

    /// Current battery level of a drone, read-only
    pub async fn battery(&self, drone_id: DroneId) -> Result<f64, ServiceError> {
        let drone = self.repository.get_drone(drone_id).await?;
        Ok(drone.battery_capacity())
    }

    async fn payload_weight(&self, drone_id: DroneId) -> Result<f64, ServiceError> {
        let items = self.repository.medications_for_drone(drone_id).await?;
        Ok(items.iter().map(|m| m.weight()).sum())
    }
}
