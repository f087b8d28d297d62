//! Errors raised while enriching a single root word

use lexis_core::{ServiceError, StorageError};
use thiserror::Error;

/// Failure of one entity's enrichment
///
/// Service errors never abort a pass. Storage errors abort it only when
/// [`StorageError::is_fatal`] says the store itself is gone.
#[derive(Error, Debug)]
pub enum EntityError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl EntityError {
    /// Convert to the error that should stop the pass, if any
    pub fn into_fatal(self) -> Result<Self, StorageError> {
        match self {
            Self::Storage(err) if err.is_fatal() => Err(err),
            other => Ok(other),
        }
    }
}
