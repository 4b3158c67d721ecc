//! Mock ResourceStore for unit testing
//!
//! This module provides an in-memory implementation of `ResourceStore` that
//! can be used in unit tests without a running API server.
//!
//! - `objects.rs` - generic get/create/replace over a keyed object map
//!
//! Behaves like the API server where the reconciler can tell the difference:
//! create assigns a UID and resourceVersion "1", replace rejects a stale
//! resourceVersion with `Conflict` and bumps it otherwise. Every call is
//! recorded, and a single failure can be queued per operation.

mod objects;

use crate::error::StoreError;
use crate::key::ObjectKey;
use crate::store_trait::ResourceStore;
use crds::Website;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Store operations, as recorded by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetWebsite,
    UpdateWebsite,
    GetDeployment,
    CreateDeployment,
    UpdateDeployment,
    GetService,
    CreateService,
    UpdateService,
}

impl StoreOp {
    /// Whether this operation writes to the store
    pub fn is_mutation(self) -> bool {
        !matches!(self, StoreOp::GetWebsite | StoreOp::GetDeployment | StoreOp::GetService)
    }
}

/// Mock ResourceStore for testing
///
/// Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct MockResourceStore {
    pub(crate) websites: Arc<Mutex<HashMap<ObjectKey, Website>>>,
    pub(crate) deployments: Arc<Mutex<HashMap<ObjectKey, Deployment>>>,
    pub(crate) services: Arc<Mutex<HashMap<ObjectKey, Service>>>,
    // Call log, in order
    pub(crate) calls: Arc<Mutex<Vec<StoreOp>>>,
    // One-shot failures, consumed by the next matching call
    pub(crate) failures: Arc<Mutex<HashMap<StoreOp, StoreError>>>,
}

impl std::fmt::Debug for MockResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockResourceStore")
            .field("calls", &self.calls.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl MockResourceStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Website to the mock store (for test setup)
    ///
    /// Assigns a UID and resourceVersion like a real create would.
    /// Not recorded in the call log.
    pub fn add_website(&self, website: Website) -> Website {
        objects::seed(&self.websites, website)
    }

    /// Add a Deployment to the mock store (for test setup)
    pub fn add_deployment(&self, deployment: Deployment) -> Deployment {
        objects::seed(&self.deployments, deployment)
    }

    /// Add a Service to the mock store (for test setup)
    pub fn add_service(&self, service: Service) -> Service {
        objects::seed(&self.services, service)
    }

    /// Overwrite a stored Website as an end user would, bumping its resourceVersion
    pub fn edit_website(&self, key: &ObjectKey, edit: impl FnOnce(&mut Website)) {
        objects::edit(&self.websites, key, edit);
    }

    /// Current Website at `key`, if any
    pub fn website(&self, key: &ObjectKey) -> Option<Website> {
        self.websites.lock().unwrap().get(key).cloned()
    }

    /// Current Deployment at `key`, if any
    pub fn deployment(&self, key: &ObjectKey) -> Option<Deployment> {
        self.deployments.lock().unwrap().get(key).cloned()
    }

    /// Current Service at `key`, if any
    pub fn service(&self, key: &ObjectKey) -> Option<Service> {
        self.services.lock().unwrap().get(key).cloned()
    }

    /// Delete the Service at `key` out-of-band (test setup)
    pub fn remove_service(&self, key: &ObjectKey) -> Option<Service> {
        self.services.lock().unwrap().remove(key)
    }

    /// Number of stored Deployments
    pub fn deployment_count(&self) -> usize {
        self.deployments.lock().unwrap().len()
    }

    /// Number of stored Services
    pub fn service_count(&self) -> usize {
        self.services.lock().unwrap().len()
    }

    /// Make the next call of `op` fail with `error`
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.failures.lock().unwrap().insert(op, error);
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `op` was called
    pub fn call_count(&self, op: StoreOp) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    /// Calls that write to the store
    pub fn mutations(&self) -> Vec<StoreOp> {
        self.calls().into_iter().filter(|c| c.is_mutation()).collect()
    }

    /// Forget recorded calls, keeping stored objects
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Record the call and return a queued failure for it, if any
    fn record(&self, op: StoreOp) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ResourceStore for MockResourceStore {
    async fn get_website(&self, key: &ObjectKey) -> Result<Website, StoreError> {
        self.record(StoreOp::GetWebsite)?;
        objects::get(&self.websites, key, "Website")
    }

    async fn update_website(&self, website: &Website) -> Result<Website, StoreError> {
        self.record(StoreOp::UpdateWebsite)?;
        objects::replace(&self.websites, website, "Website")
    }

    async fn get_deployment(&self, key: &ObjectKey) -> Result<Deployment, StoreError> {
        self.record(StoreOp::GetDeployment)?;
        objects::get(&self.deployments, key, "Deployment")
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError> {
        self.record(StoreOp::CreateDeployment)?;
        objects::create(&self.deployments, deployment, "Deployment")
    }

    async fn update_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError> {
        self.record(StoreOp::UpdateDeployment)?;
        objects::replace(&self.deployments, deployment, "Deployment")
    }

    async fn get_service(&self, key: &ObjectKey) -> Result<Service, StoreError> {
        self.record(StoreOp::GetService)?;
        objects::get(&self.services, key, "Service")
    }

    async fn create_service(&self, service: &Service) -> Result<Service, StoreError> {
        self.record(StoreOp::CreateService)?;
        objects::create(&self.services, service, "Service")
    }

    async fn update_service(&self, service: &Service) -> Result<Service, StoreError> {
        self.record(StoreOp::UpdateService)?;
        objects::replace(&self.services, service, "Service")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn service(name: &str) -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_uid_and_version() {
        let store = MockResourceStore::new();
        let created = store.create_service(&service("blog")).await.unwrap();

        assert!(created.metadata.uid.is_some());
        assert_eq!(created.metadata.resource_version.as_deref(), Some("1"));
        assert_eq!(store.service_count(), 1);
    }

    #[tokio::test]
    async fn test_create_twice_is_already_exists() {
        let store = MockResourceStore::new();
        store.create_service(&service("blog")).await.unwrap();

        let err = store.create_service(&service("blog")).await.unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(store.service_count(), 1);
    }

    #[tokio::test]
    async fn test_replace_with_stale_version_conflicts() {
        let store = MockResourceStore::new();
        let created = store.create_service(&service("blog")).await.unwrap();

        let updated = store.update_service(&created).await.unwrap();
        assert_eq!(updated.metadata.resource_version.as_deref(), Some("2"));

        // `created` still carries version 1
        let err = store.update_service(&created).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_replace_keeps_uid() {
        let store = MockResourceStore::new();
        let created = store.create_service(&service("blog")).await.unwrap();

        let mut edited = created.clone();
        edited.metadata.uid = None;
        let updated = store.update_service(&edited).await.unwrap();
        assert_eq!(updated.metadata.uid, created.metadata.uid);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MockResourceStore::new();
        let err = store
            .get_deployment(&ObjectKey::new("default", "blog"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = MockResourceStore::new();
        store.fail_next(StoreOp::CreateService, StoreError::Conflict("injected".into()));

        assert!(store.create_service(&service("blog")).await.is_err());
        assert!(store.create_service(&service("blog")).await.is_ok());
        assert_eq!(store.call_count(StoreOp::CreateService), 2);
    }

    #[tokio::test]
    async fn test_mutations_skip_reads() {
        let store = MockResourceStore::new();
        let key = ObjectKey::new("default", "blog");
        let _ = store.get_service(&key).await;
        store.create_service(&service("blog")).await.unwrap();

        assert_eq!(store.calls(), vec![StoreOp::GetService, StoreOp::CreateService]);
        assert_eq!(store.mutations(), vec![StoreOp::CreateService]);
    }
}
