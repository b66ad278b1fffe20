//! Provisioning error types

use maestro_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("timed out after {attempts} attempts waiting for condition")]
    WaitTimeout { attempts: u32 },

    #[error("wait deadline exceeded")]
    DeadlineExceeded,

    #[error("resource must be in '{expected}' state, got '{actual}' instead")]
    UnexpectedState { expected: String, actual: String },

    #[error("response data contains no matching resource")]
    MissingResult,
}

impl ProvisionError {
    /// Whether the underlying cause is a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProvisionError::Client(ClientError::NotFound))
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
