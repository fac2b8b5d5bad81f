use thiserror::Error;

/// Reasons `register` rejects its input. Checked in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name must not contain digits")]
    NameContainsDigits,

    #[error("age must be a whole number greater than zero")]
    InvalidAge,

    #[error("a specialty must be selected")]
    SpecialtyRequired,
}

/// Failure of a registry operation
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("no appointment ids left to assign")]
    IdsExhausted,
}

impl RegistryError {
    /// The validation failure, if that is what this is
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            RegistryError::Validation(e) => Some(*e),
            RegistryError::Storage(_) | RegistryError::IdsExhausted => None,
        }
    }
}

/// Marker returned by the reports when no appointments are registered
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no appointments registered")]
pub struct NoData;
