//! Fleet persistence contracts
//!
//! The core depends on these traits only; any persistence technology can sit
//! behind them. `InMemoryFleet` is the bundled implementation used by the
//! daemon and the tests.

mod memory;

pub use memory::InMemoryFleet;

use async_trait::async_trait;
use medifleet_shared::{Drone, DroneId, Medication, MedicationId};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

/// Storage failures surfaced to the core
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drone {0} does not exist")]
    DroneNotFound(DroneId),

    #[error("medication item {0} does not exist")]
    MedicationNotFound(MedicationId),

    /// Opaque backend failure, propagated unchanged by the core
    #[error("storage backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Persistence abstraction for drone and medication records.
///
/// `lock_drone` is the per-entity mutual-exclusion contract: the service
/// holds the returned guard across every read-validate-write sequence on a
/// drone, so no conflicting mutation can interleave. The guard is released
/// on all exit paths by dropping it.
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn get_drone(&self, id: DroneId) -> Result<Drone, StoreError>;

    async fn save_drone(&self, drone: &Drone) -> Result<(), StoreError>;

    /// Delete a drone. Medications loaded on it survive with their drone
    /// reference cleared.
    async fn delete_drone(&self, id: DroneId) -> Result<(), StoreError>;

    async fn get_medication(&self, id: MedicationId) -> Result<Medication, StoreError>;

    async fn save_medication(&self, medication: &Medication) -> Result<(), StoreError>;

    /// Delete a medication. Removes its stored image as a side effect.
    async fn delete_medication(&self, id: MedicationId) -> Result<(), StoreError>;

    async fn list_drones(&self) -> Result<Vec<Drone>, StoreError>;

    /// Medications currently attached to a drone, in stable order by id
    async fn medications_for_drone(&self, id: DroneId) -> Result<Vec<Medication>, StoreError>;

    /// Acquire exclusive access to a drone for a read-validate-write sequence
    async fn lock_drone(&self, id: DroneId) -> OwnedMutexGuard<()>;
}

/// Binary storage for medication images. Only the handle is visible to the
/// core; upload handling lives at the delivery boundary.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, image_ref: &str) -> Result<(), StoreError>;

    async fn remove(&self, image_ref: &str) -> Result<(), StoreError>;

    async fn contains(&self, image_ref: &str) -> bool;
}
