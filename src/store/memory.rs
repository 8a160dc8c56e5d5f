//! In-memory fleet store
//!
//! Backs the daemon and the test suite. Entity maps sit behind `RwLock`s;
//! per-drone mutexes in a lazily grown registry provide the exclusive-access
//! contract of `FleetRepository::lock_drone`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use medifleet_shared::{Drone, DroneId, Medication, MedicationId};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::{FleetRepository, ImageStore, StoreError};

/// In-memory implementation of the fleet repository and image store
#[derive(Default)]
pub struct InMemoryFleet {
    drones: RwLock<HashMap<DroneId, Drone>>,
    medications: RwLock<HashMap<MedicationId, Medication>>,
    images: RwLock<HashSet<String>>,
    /// Lock registry keyed by drone id; grown on first access
    locks: Mutex<HashMap<DroneId, Arc<Mutex<()>>>>,
}

impl InMemoryFleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drones in the store
    pub async fn drone_count(&self) -> usize {
        self.drones.read().await.len()
    }
}

#[async_trait]
impl FleetRepository for InMemoryFleet {
    async fn get_drone(&self, id: DroneId) -> Result<Drone, StoreError> {
        self.drones
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::DroneNotFound(id))
    }

    async fn save_drone(&self, drone: &Drone) -> Result<(), StoreError> {
        self.drones.write().await.insert(drone.id(), drone.clone());
        Ok(())
    }

    async fn delete_drone(&self, id: DroneId) -> Result<(), StoreError> {
        let removed = self.drones.write().await.remove(&id);
        if removed.is_none() {
            return Err(StoreError::DroneNotFound(id));
        }

        // SET_NULL semantics: loaded items outlive the drone
        let mut medications = self.medications.write().await;
        for medication in medications.values_mut() {
            if medication.drone() == Some(id) {
                medication.detach();
            }
        }
        Ok(())
    }

    async fn get_medication(&self, id: MedicationId) -> Result<Medication, StoreError> {
        self.medications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::MedicationNotFound(id))
    }

    async fn save_medication(&self, medication: &Medication) -> Result<(), StoreError> {
        self.medications
            .write()
            .await
            .insert(medication.id(), medication.clone());
        Ok(())
    }

    async fn delete_medication(&self, id: MedicationId) -> Result<(), StoreError> {
        let removed = self
            .medications
            .write()
            .await
            .remove(&id)
            .ok_or(StoreError::MedicationNotFound(id))?;

        if let Some(image_ref) = removed.image_ref() {
            self.remove(image_ref).await?;
        }
        Ok(())
    }

    async fn list_drones(&self) -> Result<Vec<Drone>, StoreError> {
        let mut drones: Vec<Drone> = self.drones.read().await.values().cloned().collect();
        drones.sort_by_key(|d| d.id());
        Ok(drones)
    }

    async fn medications_for_drone(&self, id: DroneId) -> Result<Vec<Medication>, StoreError> {
        let mut items: Vec<Medication> = self
            .medications
            .read()
            .await
            .values()
            .filter(|m| m.drone() == Some(id))
            .cloned()
            .collect();
        items.sort_by_key(|m| m.id());
        Ok(items)
    }

    async fn lock_drone(&self, id: DroneId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[async_trait]
impl ImageStore for InMemoryFleet {
    async fn put(&self, image_ref: &str) -> Result<(), StoreError> {
        self.images.write().await.insert(image_ref.to_string());
        Ok(())
    }

    async fn remove(&self, image_ref: &str) -> Result<(), StoreError> {
        self.images.write().await.remove(image_ref);
        Ok(())
    }

    async fn contains(&self, image_ref: &str) -> bool {
        self.images.read().await.contains(image_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medifleet_shared::DroneModel;

    fn drone(id: DroneId, serial: &str) -> Drone {
        Drone::new(id, serial, DroneModel::Middleweight, 300.0, 80.0).unwrap()
    }

    fn medication(id: MedicationId, image_ref: Option<&str>) -> Medication {
        Medication::new(id, "aspirin", 50.0, "ASP_755", image_ref.map(String::from)).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_drone() {
        let fleet = InMemoryFleet::new();
        assert!(matches!(
            fleet.get_drone(9).await,
            Err(StoreError::DroneNotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_save_and_list_drones_is_stable_by_id() {
        let fleet = InMemoryFleet::new();
        for id in [3, 1, 2] {
            fleet.save_drone(&drone(id, &format!("D{id}"))).await.unwrap();
        }
        let ids: Vec<DroneId> = fleet
            .list_drones()
            .await
            .unwrap()
            .iter()
            .map(|d| d.id())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_drone_detaches_medications() {
        let fleet = InMemoryFleet::new();
        fleet.save_drone(&drone(1, "D1")).await.unwrap();

        let mut med = medication(10, None);
        med.attach_to(1);
        fleet.save_medication(&med).await.unwrap();

        fleet.delete_drone(1).await.unwrap();

        let survivor = fleet.get_medication(10).await.unwrap();
        assert_eq!(survivor.drone(), None);
    }

    #[tokio::test]
    async fn test_delete_medication_removes_image() {
        let fleet = InMemoryFleet::new();
        fleet.put("uploads/asp.png").await.unwrap();
        fleet
            .save_medication(&medication(10, Some("uploads/asp.png")))
            .await
            .unwrap();

        fleet.delete_medication(10).await.unwrap();

        assert!(!fleet.contains("uploads/asp.png").await);
        assert!(matches!(
            fleet.get_medication(10).await,
            Err(StoreError::MedicationNotFound(10))
        ));
    }

    #[tokio::test]
    async fn test_medications_for_drone_filters_and_sorts() {
        let fleet = InMemoryFleet::new();
        for (id, attached) in [(5, true), (2, false), (9, true)] {
            let mut med = medication(id, None);
            if attached {
                med.attach_to(1);
            }
            fleet.save_medication(&med).await.unwrap();
        }

        let ids: Vec<MedicationId> = fleet
            .medications_for_drone(1)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id())
            .collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[tokio::test]
    async fn test_lock_drone_serializes_access() {
        let fleet = Arc::new(InMemoryFleet::new());

        let guard = fleet.lock_drone(1).await;
        let contender = {
            let fleet = fleet.clone();
            tokio::spawn(async move {
                let _guard = fleet.lock_drone(1).await;
            })
        };

        // Contender cannot finish while the guard is held
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }
}
