//! Resource store errors

use thiserror::Error;

/// Errors that can occur when reading or writing objects in the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object exists at the requested key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Create was rejected because an object already exists at the key
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Update was rejected because the submitted resourceVersion is stale
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other Kubernetes API or transport failure
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Object is missing the metadata needed to address it
    #[error("Invalid object: {0}")]
    InvalidObject(String),
}

impl StoreError {
    /// Returns true for the not-found signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Returns true for the already-exists signal returned by create.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }

    /// Whether a later attempt against fresh state may succeed.
    ///
    /// Conflicts and transport/API failures are retryable. A malformed
    /// object will be rejected the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Conflict(_) | StoreError::Kube(_) => true,
            StoreError::NotFound(_) | StoreError::AlreadyExists(_) | StoreError::InvalidObject(_) => false,
        }
    }

    /// Maps a failed GET.
    pub(crate) fn from_get(err: kube::Error, what: &str) -> Self {
        match err {
            kube::Error::Api(ref ae) if ae.code == 404 => StoreError::NotFound(what.to_string()),
            e => StoreError::Kube(e),
        }
    }

    /// Maps a failed POST. A 409 on create always means the name is taken.
    pub(crate) fn from_create(err: kube::Error, what: &str) -> Self {
        match err {
            kube::Error::Api(ref ae) if ae.code == 409 => StoreError::AlreadyExists(what.to_string()),
            e => StoreError::Kube(e),
        }
    }

    /// Maps a failed PUT. A 409 on replace is an optimistic-concurrency clash.
    pub(crate) fn from_update(err: kube::Error, what: &str) -> Self {
        match err {
            kube::Error::Api(ref ae) if ae.code == 409 => StoreError::Conflict(what.to_string()),
            kube::Error::Api(ref ae) if ae.code == 404 => StoreError::NotFound(what.to_string()),
            e => StoreError::Kube(e),
        }
    }
}
