//! Controller-specific error types.
//!
//! This module defines error types specific to the Website Controller
//! that are not covered by upstream library errors.

use resource_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the Website Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes client setup error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Get/create/update against the API server failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Last-applied spec annotation could not be encoded or decoded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A dependent exists at the Website's key but is not controlled by it
    #[error("Not owned by this Website: {0}")]
    NotOwned(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ControllerError {
    /// Whether requeueing the same Website may succeed.
    ///
    /// A corrupt snapshot, a name clash with a foreign object or bad
    /// configuration fails identically every time until a human fixes it.
    pub fn is_retryable(&self) -> bool {
        match self {
            ControllerError::Kube(_) => true,
            ControllerError::Store(e) => e.is_retryable(),
            ControllerError::Snapshot(_) | ControllerError::NotOwned(_) | ControllerError::InvalidConfig(_) => false,
        }
    }
}
