//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the reconciler
//! into kube-runtime: Websites are watched directly, and Deployments and
//! Services are watched through their owner references so out-of-band
//! edits to them trigger a reconcile of the owning Website.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::{self, Context};
use crds::Website;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{Api, Client};
use kube_runtime::Controller as RuntimeController;
use kube_runtime::watcher::Config;
use resource_store::KubeStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main controller for Website management.
pub struct Controller {
    client: Client,
    config: ControllerConfig,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing Website Controller");

        // Create Kubernetes client
        let client = Client::try_default().await?;

        Ok(Self { client, config })
    }

    /// Runs the controller until a shutdown signal arrives.
    pub async fn run(self) -> Result<(), ControllerError> {
        let websites: Api<Website> = self.api();
        let deployments: Api<Deployment> = self.api();
        let services: Api<Service> = self.api();

        let reconciler = Reconciler::new(Box::new(KubeStore::new(self.client.clone())));
        let context = Arc::new(Context {
            reconciler,
            config: self.config.clone(),
        });

        info!("Website Controller running");

        RuntimeController::new(websites, Config::default())
            .owns(deployments, Config::default())
            .owns(services, Config::default())
            .shutdown_on_signal()
            .run(watcher::reconcile, watcher::error_policy, context)
            .for_each(|result| async move {
                match result {
                    Ok((website, _action)) => debug!("Reconcile finished for Website {}", website),
                    Err(e) => warn!("Reconcile loop error: {}", e),
                }
            })
            .await;

        info!("Website Controller stopped");
        Ok(())
    }

    fn api<K>(&self) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope, DynamicType = ()>,
    {
        match self.config.namespace.as_deref() {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}
