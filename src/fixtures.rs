//! Fixture loading
//!
//! JSON seed data for the in-memory store, used by the daemon and the test
//! suite. Fixtures go through the entity constructors, so invalid seed data
//! is rejected the same way invalid requests are.

use anyhow::{Context, Result};
use medifleet_shared::{Drone, DroneId, DroneModel, Medication, MedicationId};
use serde::Deserialize;

use crate::store::{FleetRepository, InMemoryFleet};

/// A complete fixture file
#[derive(Debug, Deserialize)]
pub struct FixtureSet {
    #[serde(default)]
    pub drones: Vec<DroneFixture>,
    #[serde(default)]
    pub medications: Vec<MedicationFixture>,
}

#[derive(Debug, Deserialize)]
pub struct DroneFixture {
    pub id: DroneId,
    pub serial_number: String,
    pub model: DroneModel,
    pub weight_limit: f64,
    pub battery_capacity: f64,
}

#[derive(Debug, Deserialize)]
pub struct MedicationFixture {
    pub id: MedicationId,
    pub name: String,
    pub weight: f64,
    pub code: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Drone to attach the item to, if pre-loaded
    #[serde(default)]
    pub drone: Option<DroneId>,
}

/// Parse a fixture file
pub fn parse(json: &str) -> Result<FixtureSet> {
    serde_json::from_str(json).context("failed to parse fixture JSON")
}

/// Seed a store from a fixture set
pub async fn seed(fleet: &InMemoryFleet, fixtures: &FixtureSet) -> Result<()> {
    for fixture in &fixtures.drones {
        let drone = Drone::new(
            fixture.id,
            &fixture.serial_number,
            fixture.model,
            fixture.weight_limit,
            fixture.battery_capacity,
        )
        .with_context(|| format!("fixture drone {}", fixture.serial_number))?;
        fleet.save_drone(&drone).await?;
    }

    for fixture in &fixtures.medications {
        let mut medication = Medication::new(
            fixture.id,
            &fixture.name,
            fixture.weight,
            &fixture.code,
            fixture.image_ref.clone(),
        )
        .with_context(|| format!("fixture medication {}", fixture.name))?;
        if let Some(drone_id) = fixture.drone {
            medication.attach_to(drone_id);
        }
        fleet.save_medication(&medication).await?;
    }

    Ok(())
}
