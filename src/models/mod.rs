pub mod appointment;
pub mod error;
pub mod registry;
pub mod reports;
pub mod specialty;

pub use appointment::Appointment;
pub use error::{NoData, RegistryError, ValidationError};
pub use registry::{DEFAULT_STORAGE_KEY, TurnoRegistry, validate_input};
pub use reports::{DEFAULT_SLOT_MINUTES, SpecialtyShare, Statistics, WaitTime};
pub use specialty::Specialty;
