//! Medication record
//!
//! A value entity describing one medication item. A medication lives
//! independently of any drone; the `drone` field is a weak back-reference
//! that is set by the load operation and cleared on detachment or when the
//! owning drone is deleted.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{DroneId, MedicationId};

/// A single medication item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    id: MedicationId,
    name: String,
    weight: f64,
    code: String,
    image_ref: Option<String>,
    drone: Option<DroneId>,
}

impl Medication {
    /// Create a medication record, validating the name and code patterns.
    ///
    /// Names allow ASCII alphanumerics, dashes and underscores; codes allow
    /// uppercase ASCII alphanumerics and underscores.
    pub fn new(
        id: MedicationId,
        name: impl Into<String>,
        weight: f64,
        code: impl Into<String>,
        image_ref: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let code = code.into();

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::ValidationFailed {
                field: "name",
                reason: format!(
                    "{name:?} contains characters outside alphanumerics, dashes and underscores"
                ),
            });
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(DomainError::ValidationFailed {
                field: "code",
                reason: format!(
                    "{code:?} contains characters outside uppercase alphanumerics and underscores"
                ),
            });
        }

        Ok(Self {
            id,
            name,
            weight,
            code,
            image_ref,
            drone: None,
        })
    }

    pub fn id(&self) -> MedicationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item weight in grams
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Opaque handle to the stored image, if one was uploaded
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// The drone this item is currently loaded on, if any
    pub fn drone(&self) -> Option<DroneId> {
        self.drone
    }

    /// Attach this item to a drone. Called by the load operation only.
    pub fn attach_to(&mut self, drone_id: DroneId) {
        self.drone = Some(drone_id);
    }

    /// Clear the drone back-reference. Once cleared it stays null until the
    /// item is explicitly loaded again.
    pub fn detach(&mut self) {
        self.drone = None;
    }
}
