use serde::{Deserialize, Serialize};

use super::specialty::Specialty;

/// Display format for `registered_at` (local wall-clock time)
pub const REGISTERED_AT_FORMAT: &str = "%H:%M:%S";

/// A single registered appointment ("turno")
///
/// Field names in the serialized form are fixed: `id`, `name`, `age`,
/// `specialty`, `registeredAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Registry-assigned identifier (never reused)
    pub id: u64,
    /// Patient name, trimmed
    pub name: String,
    /// Patient age in years, always > 0
    pub age: u32,
    pub specialty: Specialty,
    /// Wall-clock time of registration, already formatted for display
    #[serde(rename = "registeredAt")]
    pub registered_at: String,
}

impl Appointment {
    /// Build a record stamped with the current local time
    pub(crate) fn new(id: u64, name: String, age: u32, specialty: Specialty) -> Self {
        Appointment {
            id,
            name,
            age,
            specialty,
            registered_at: chrono::Local::now()
                .format(REGISTERED_AT_FORMAT)
                .to_string(),
        }
    }
}
