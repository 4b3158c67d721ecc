//! Kubernetes-backed resource store
//!
//! Thin wrapper over `kube::Api` that maps API status codes onto the
//! `StoreError` signals the reconciler branches on.

use crate::error::StoreError;
use crate::key::ObjectKey;
use crate::store_trait::ResourceStore;
use crds::Website;
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::api::PostParams;
use kube::{Api, Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// Resource store talking to the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    /// Create a store from an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn get<K>(&self, key: &ObjectKey) -> Result<K, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()> + Clone + DeserializeOwned + Debug,
    {
        let what = describe::<K>(key);
        debug!("GET {}", what);
        self.api::<K>(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|e| StoreError::from_get(e, &what))
    }

    async fn create<K>(&self, obj: &K) -> Result<K, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
    {
        let key = ObjectKey::from_resource(obj)?;
        let what = describe::<K>(&key);
        debug!("CREATE {}", what);
        self.api::<K>(&key.namespace)
            .create(&PostParams::default(), obj)
            .await
            .map_err(|e| StoreError::from_create(e, &what))
    }

    async fn replace<K>(&self, obj: &K) -> Result<K, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
    {
        let key = ObjectKey::from_resource(obj)?;
        let what = describe::<K>(&key);
        debug!("REPLACE {}", what);
        self.api::<K>(&key.namespace)
            .replace(&key.name, &PostParams::default(), obj)
            .await
            .map_err(|e| StoreError::from_update(e, &what))
    }
}

/// "Kind namespace/name", used in error messages and logs
fn describe<K: Resource<DynamicType = ()>>(key: &ObjectKey) -> String {
    format!("{} {}", K::kind(&()), key)
}

#[async_trait::async_trait]
impl ResourceStore for KubeStore {
    async fn get_website(&self, key: &ObjectKey) -> Result<Website, StoreError> {
        self.get(key).await
    }

    async fn update_website(&self, website: &Website) -> Result<Website, StoreError> {
        self.replace(website).await
    }

    async fn get_deployment(&self, key: &ObjectKey) -> Result<Deployment, StoreError> {
        self.get(key).await
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError> {
        self.create(deployment).await
    }

    async fn update_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError> {
        self.replace(deployment).await
    }

    async fn get_service(&self, key: &ObjectKey) -> Result<Service, StoreError> {
        self.get(key).await
    }

    async fn create_service(&self, service: &Service) -> Result<Service, StoreError> {
        self.create(service).await
    }

    async fn update_service(&self, service: &Service) -> Result<Service, StoreError> {
        self.replace(service).await
    }
}
