//! ResourceStore trait for mocking
//!
//! This trait abstracts the Kubernetes API so the reconciler can be unit
//! tested against an in-memory store. `KubeStore` implements it for real
//! clusters and `MockResourceStore` (feature `test-util`) for tests.

use crate::error::StoreError;
use crate::key::ObjectKey;
use crds::Website;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;

/// Keyed CRUD over the three object kinds the website controller touches
///
/// Every `get_*` returns `StoreError::NotFound` when nothing exists at the key.
/// Every `create_*` returns `StoreError::AlreadyExists` when the name is taken.
/// Every `update_*` is a full replace guarded by `metadata.resourceVersion`
/// and returns `StoreError::Conflict` when that version is stale.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ResourceStore: Send + Sync {
    // Website
    async fn get_website(&self, key: &ObjectKey) -> Result<Website, StoreError>;
    async fn update_website(&self, website: &Website) -> Result<Website, StoreError>;

    // Deployment
    async fn get_deployment(&self, key: &ObjectKey) -> Result<Deployment, StoreError>;
    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError>;
    async fn update_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError>;

    // Service
    async fn get_service(&self, key: &ObjectKey) -> Result<Service, StoreError>;
    async fn create_service(&self, service: &Service) -> Result<Service, StoreError>;
    async fn update_service(&self, service: &Service) -> Result<Service, StoreError>;
}
