//! Generic object operations for MockResourceStore
//!
//! Handles UIDs, resourceVersions and the not-found/already-exists/conflict
//! signals identically for every kind.

use crate::error::StoreError;
use crate::key::ObjectKey;
use kube::Resource;
use std::collections::HashMap;
use std::sync::Mutex;

pub(crate) fn get<K: Clone>(
    objects: &Mutex<HashMap<ObjectKey, K>>,
    key: &ObjectKey,
    kind: &str,
) -> Result<K, StoreError> {
    objects
        .lock()
        .unwrap()
        .get(key)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(format!("{kind} {key}")))
}

pub(crate) fn create<K: Resource + Clone>(
    objects: &Mutex<HashMap<ObjectKey, K>>,
    obj: &K,
    kind: &str,
) -> Result<K, StoreError> {
    let key = ObjectKey::from_resource(obj)?;
    let mut objects = objects.lock().unwrap();
    if objects.contains_key(&key) {
        return Err(StoreError::AlreadyExists(format!("{kind} {key}")));
    }

    let mut stored = obj.clone();
    let meta = stored.meta_mut();
    meta.uid = Some(uuid::Uuid::new_v4().to_string());
    meta.resource_version = Some("1".to_string());
    objects.insert(key, stored.clone());
    Ok(stored)
}

pub(crate) fn replace<K: Resource + Clone>(
    objects: &Mutex<HashMap<ObjectKey, K>>,
    obj: &K,
    kind: &str,
) -> Result<K, StoreError> {
    let key = ObjectKey::from_resource(obj)?;
    let mut objects = objects.lock().unwrap();
    let existing = objects
        .get(&key)
        .ok_or_else(|| StoreError::NotFound(format!("{kind} {key}")))?;

    let current_version = existing.meta().resource_version.clone();
    // An unset resourceVersion means an unconditional replace
    if let Some(submitted) = obj.meta().resource_version.as_ref() {
        if current_version.as_ref() != Some(submitted) {
            return Err(StoreError::Conflict(format!(
                "{kind} {key}: resourceVersion {submitted} is stale (current {})",
                current_version.as_deref().unwrap_or("<none>")
            )));
        }
    }

    let mut stored = obj.clone();
    let uid = existing.meta().uid.clone();
    let meta = stored.meta_mut();
    meta.uid = uid;
    meta.resource_version = Some(next_version(current_version.as_deref()));
    objects.insert(key, stored.clone());
    Ok(stored)
}

/// Insert or overwrite without conflict checks (test setup)
pub(crate) fn seed<K: Resource + Clone>(objects: &Mutex<HashMap<ObjectKey, K>>, obj: K) -> K {
    let key = ObjectKey::from_resource(&obj).unwrap();
    let mut objects = objects.lock().unwrap();
    let current_version = objects.get(&key).and_then(|o| o.meta().resource_version.clone());

    let mut stored = obj;
    let meta = stored.meta_mut();
    if meta.uid.is_none() {
        meta.uid = Some(uuid::Uuid::new_v4().to_string());
    }
    meta.resource_version = Some(next_version(current_version.as_deref()));
    objects.insert(key, stored.clone());
    stored
}

/// Mutate a stored object in place, bumping its resourceVersion (test setup)
pub(crate) fn edit<K: Resource + Clone>(
    objects: &Mutex<HashMap<ObjectKey, K>>,
    key: &ObjectKey,
    edit: impl FnOnce(&mut K),
) {
    let mut objects = objects.lock().unwrap();
    if let Some(obj) = objects.get_mut(key) {
        edit(obj);
        let bumped = next_version(obj.meta().resource_version.as_deref());
        obj.meta_mut().resource_version = Some(bumped);
    }
}

fn next_version(current: Option<&str>) -> String {
    let current = current.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
    (current + 1).to_string()
}
