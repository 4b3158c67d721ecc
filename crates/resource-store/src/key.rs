//! Namespace/name addressing for namespaced objects

use crate::error::StoreError;
use kube::Resource;
use std::fmt;

/// Identifies a namespaced object: a Website and its dependents share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Object namespace
    pub namespace: String,
    /// Object name
    pub name: String,
}

impl ObjectKey {
    /// Create a key from a namespace and a name
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Read the key off an object's metadata.
    ///
    /// Fails if either the namespace or the name is unset.
    pub fn from_resource<K: Resource>(obj: &K) -> Result<Self, StoreError> {
        let meta = obj.meta();
        let name = meta
            .name
            .clone()
            .ok_or_else(|| StoreError::InvalidObject("object has no metadata.name".to_string()))?;
        let namespace = meta.namespace.clone().ok_or_else(|| {
            StoreError::InvalidObject(format!("object {name} has no metadata.namespace"))
        })?;
        Ok(Self { namespace, name })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
