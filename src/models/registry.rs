use anyhow::Context;
use std::collections::HashSet;

use super::appointment::Appointment;
use super::error::{NoData, RegistryError, ValidationError};
use super::reports::{self, DEFAULT_SLOT_MINUTES, Statistics, WaitTime};
use super::specialty::Specialty;
use crate::storage::KeyValueStore;

/// Default storage key for the appointment list
pub const DEFAULT_STORAGE_KEY: &str = "turnos";

/// Ordered list of registered appointments, mirrored to a key-value store
///
/// Entries are kept in registration order. Every successful mutation rewrites
/// the whole list under a single key, so the store always matches memory.
pub struct TurnoRegistry<S: KeyValueStore> {
    /// Appointments in registration order
    appointments: Vec<Appointment>,
    /// Next ID to assign (monotonic counter)
    next_id: u64,
    store: S,
    key: String,
    slot_minutes: u32,
}

impl<S: KeyValueStore> TurnoRegistry<S> {
    /// Create an empty registry backed by `store` under `key`.
    /// Nothing is read until [`load_from_store`](Self::load_from_store).
    pub fn new(store: S, key: impl Into<String>) -> Self {
        TurnoRegistry {
            appointments: Vec::new(),
            next_id: 1,
            store,
            key: key.into(),
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }

    /// Create a registry and load whatever the store already holds
    pub fn open(store: S, key: impl Into<String>) -> Result<Self, RegistryError> {
        let mut registry = Self::new(store, key);
        registry.load_from_store()?;
        Ok(registry)
    }

    /// Override the minutes per slot used by the wait-time report
    pub fn with_slot_minutes(mut self, slot_minutes: u32) -> Self {
        self.slot_minutes = slot_minutes;
        self
    }

    /// Replace the in-memory list with the stored one.
    ///
    /// An absent or blank value yields an empty list. A value that does not
    /// decode, or decodes to records registration would never have produced
    /// (see [`check_stored`]), is backed up under a timestamped
    /// `<key>.corrupted.*` key and the registry starts empty.
    pub fn load_from_store(&mut self) -> Result<(), RegistryError> {
        let raw = self
            .store
            .load(&self.key)
            .with_context(|| format!("Failed to load appointments under '{}'", self.key))
            .map_err(RegistryError::Storage)?;

        let decoded = match raw.as_deref().map(str::trim) {
            None | Some("") => Ok((Vec::new(), 1)),
            Some(json) => serde_json::from_str::<Vec<Appointment>>(json)
                .map_err(|e| e.to_string())
                .and_then(|appointments| {
                    let next_id = check_stored(&appointments)?;
                    Ok((appointments, next_id))
                })
                .map_err(|reason| (json, reason)),
        };

        let (appointments, next_id) = match decoded {
            Ok(loaded) => loaded,
            Err((json, reason)) => {
                self.back_up_corrupted(json, &reason);
                (Vec::new(), 1)
            }
        };

        self.next_id = next_id;
        self.appointments = appointments;

        log::info!(
            "Loaded {} appointments from '{}', next id {}",
            self.appointments.len(),
            self.key,
            self.next_id
        );

        Ok(())
    }

    /// Copy an unusable stored value aside so the next save cannot lose it
    fn back_up_corrupted(&self, raw: &str, reason: &str) {
        let backup_key = format!(
            "{}.corrupted.{}",
            self.key,
            chrono::Local::now().format("%Y%m%d-%H%M%S-%3f")
        );
        log::warn!(
            "Stored appointments under '{}' are corrupted, backing up to '{}': {}",
            self.key,
            backup_key,
            reason
        );
        if let Err(backup_err) = self.store.save(&backup_key, raw) {
            log::error!("Failed to back up corrupted appointments: {:#}", backup_err);
        }
    }

    /// Validate raw input and append a new appointment.
    ///
    /// Validation failures leave the registry untouched: no id is consumed
    /// and nothing is written.
    pub fn register(
        &mut self,
        name: &str,
        age: &str,
        specialty: &str,
    ) -> Result<Appointment, RegistryError> {
        let (name, age, specialty) = validate_input(name, age, specialty)?;

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(RegistryError::IdsExhausted)?;

        let appointment = Appointment::new(id, name, age, specialty);
        self.appointments.push(appointment.clone());

        if let Err(e) = self.persist() {
            // Keep memory in sync with the store; the id stays consumed
            self.appointments.pop();
            return Err(e);
        }

        log::info!(
            "Registered appointment {} for {} ({})",
            appointment.id,
            appointment.name,
            appointment.specialty
        );

        Ok(appointment)
    }

    /// Remove every appointment with `id` (at most one once loaded).
    ///
    /// The list is persisted even when nothing matched. Returns whether a
    /// record was removed.
    pub fn remove(&mut self, id: u64) -> Result<bool, RegistryError> {
        let previous = self.appointments.clone();
        self.appointments.retain(|a| a.id != id);
        let removed = self.appointments.len() != previous.len();

        if let Err(e) = self.persist() {
            self.appointments = previous;
            return Err(e);
        }

        if removed {
            log::info!("Removed appointment {}", id);
        } else {
            log::debug!("Appointment {} not found, nothing removed", id);
        }

        Ok(removed)
    }

    /// Estimated wait per appointment, in registration order
    pub fn wait_times(&self) -> Result<Vec<WaitTime>, NoData> {
        reports::wait_times(&self.appointments, self.slot_minutes)
    }

    /// Total, mean age and per-specialty distribution
    pub fn statistics(&self) -> Result<Statistics, NoData> {
        reports::statistics(&self.appointments)
    }

    /// Write the full list under the registry key
    fn persist(&self) -> Result<(), RegistryError> {
        let json = serde_json::to_string(&self.appointments)
            .context("Failed to serialize appointments")
            .map_err(RegistryError::Storage)?;

        self.store
            .save(&self.key, &json)
            .with_context(|| format!("Failed to save appointments under '{}'", self.key))
            .map_err(RegistryError::Storage)?;

        log::debug!("Saved {} appointments to '{}'", self.appointments.len(), self.key);
        Ok(())
    }

    /// Get appointment by ID
    pub fn get(&self, id: u64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Get a reference to all appointments
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Get next available ID
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Check raw registration input, first failure wins.
///
/// Order: empty name, digits in name, age, specialty. Returns the trimmed
/// name, parsed age and resolved specialty.
pub fn validate_input(
    name: &str,
    age: &str,
    specialty: &str,
) -> Result<(String, u32, Specialty), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NameContainsDigits);
    }

    let age = age
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|&age| age > 0)
        .and_then(|age| u32::try_from(age).ok())
        .ok_or(ValidationError::InvalidAge)?;

    let specialty = Specialty::resolve(specialty).ok_or(ValidationError::SpecialtyRequired)?;

    Ok((name.to_string(), age, specialty))
}

/// Check a decoded list against the invariants registration guarantees.
///
/// Every record needs a positive, unique id, a non-blank name without digits
/// and a positive age. Returns the next id to assign.
pub fn check_stored(appointments: &[Appointment]) -> Result<u64, String> {
    let mut seen = HashSet::with_capacity(appointments.len());
    let mut max_id: u64 = 0;

    for a in appointments {
        if a.id == 0 {
            return Err("record with id 0".to_string());
        }
        if !seen.insert(a.id) {
            return Err(format!("duplicate id {}", a.id));
        }
        let name = a.name.trim();
        if name.is_empty() || name.chars().any(|c| c.is_ascii_digit()) {
            return Err(format!("record {} has an invalid name", a.id));
        }
        if a.age == 0 {
            return Err(format!("record {} has an invalid age", a.id));
        }
        max_id = max_id.max(a.id);
    }

    max_id
        .checked_add(1)
        .ok_or_else(|| format!("id {} leaves no room for new appointments", max_id))
}
