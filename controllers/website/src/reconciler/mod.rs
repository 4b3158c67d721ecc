//! Reconciliation logic for Website CRDs.
//!
//! Each reconcile re-reads the Website, then takes one of three paths:
//! - creation: no Deployment yet, so create the Deployment and Service and
//!   record the applied spec as a snapshot annotation on the Website
//! - no-op: the snapshot matches the current spec
//! - update: the spec drifted from the snapshot, so rewrite the `.spec` of
//!   both dependents and record the new snapshot
//!
//! Dependent cleanup on Website deletion is left to the API server's garbage
//! collector via owner references.

pub mod builders;
pub mod snapshot;


use crate::error::ControllerError;
use builders::{build_deployment, build_service};
use crds::Website;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use resource_store::{ObjectKey, ResourceStore};
use tracing::{debug, info, warn};

/// Which path a successful reconcile took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The Website no longer exists
    WebsiteNotFound,
    /// The Website is being deleted
    WebsiteDeleting,
    /// Dependents were created and the snapshot recorded
    Created,
    /// The spec matches the snapshot; nothing was written
    Unchanged,
    /// Dependents were rewritten for a changed spec
    Updated,
}

/// Reconciles Website resources.
pub struct Reconciler {
    pub(crate) store: Box<dyn ResourceStore>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(store: Box<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Reconciles the Website at `key`.
    ///
    /// Errors are returned untouched so the caller can requeue. The only
    /// store errors absorbed here are a missing Website and an
    /// already-existing dependent during creation, which is taken over only
    /// if its controller owner reference already points at this Website.
    pub async fn reconcile_website(&self, key: &ObjectKey) -> Result<ReconcileOutcome, ControllerError> {
        let website = match self.store.get_website(key).await {
            Ok(website) => website,
            Err(e) if e.is_not_found() => {
                debug!("Website {} not found, nothing to do", key);
                return Ok(ReconcileOutcome::WebsiteNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        if website.metadata.deletion_timestamp.is_some() {
            debug!("Website {} is being deleted, skipping", key);
            return Ok(ReconcileOutcome::WebsiteDeleting);
        }

        match self.store.get_deployment(key).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                info!("Deployment {} not found, creating dependents", key);
                return self.create_dependents(key, website).await;
            }
            Err(e) => return Err(e.into()),
        }

        // A Deployment without a snapshot means an earlier creation stopped
        // before the Website update; finish it instead of failing forever.
        let Some(last_applied) = snapshot::read_snapshot(&website)? else {
            warn!(
                "Website {} has a Deployment but no '{}' annotation, resuming creation",
                key,
                snapshot::SPEC_ANNOTATION
            );
            return self.create_dependents(key, website).await;
        };

        if !snapshot::spec_changed(&last_applied, &website.spec) {
            debug!("Website {} spec unchanged since last apply", key);
            return Ok(ReconcileOutcome::Unchanged);
        }

        info!("Website {} spec changed, updating Deployment and Service", key);
        self.update_dependents(key, website).await
    }

    async fn create_dependents(
        &self,
        key: &ObjectKey,
        mut website: Website,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let deployment = build_deployment(&website);
        match self.store.create_deployment(&deployment).await {
            Ok(_) => info!("Created Deployment {}", key),
            Err(e) if e.is_already_exists() => {
                info!("Deployment {} already exists, reapplying spec", key);
                self.replace_deployment_spec(key, &website, deployment).await?;
            }
            Err(e) => return Err(e.into()),
        }

        // No rollback if this fails: the next attempt sees the Deployment,
        // finds no snapshot and resumes here.
        let service = build_service(&website);
        match self.store.create_service(&service).await {
            Ok(_) => info!("Created Service {}", key),
            Err(e) if e.is_already_exists() => {
                info!("Service {} already exists, reapplying spec", key);
                self.replace_service_spec(key, &website, service).await?;
            }
            Err(e) => return Err(e.into()),
        }

        self.record_snapshot(key, &mut website).await?;
        Ok(ReconcileOutcome::Created)
    }

    async fn update_dependents(
        &self,
        key: &ObjectKey,
        mut website: Website,
    ) -> Result<ReconcileOutcome, ControllerError> {
        self.replace_deployment_spec(key, &website, build_deployment(&website)).await?;
        self.replace_service_spec(key, &website, build_service(&website)).await?;
        info!("Updated Deployment and Service {}", key);

        // Without this every later reconcile would see the same drift
        self.record_snapshot(key, &mut website).await?;
        Ok(ReconcileOutcome::Updated)
    }

    /// Overwrite only `.spec` of the live Deployment; metadata, identity and
    /// owner references stay as stored. Refuses objects `website` does not control.
    async fn replace_deployment_spec(
        &self,
        key: &ObjectKey,
        website: &Website,
        desired: Deployment,
    ) -> Result<(), ControllerError> {
        let mut live = self.store.get_deployment(key).await?;
        ensure_controlled_by(&live.metadata, website, "Deployment", key)?;
        live.spec = desired.spec;
        self.store.update_deployment(&live).await?;
        Ok(())
    }

    /// Overwrite only `.spec` of the live Service. Same ownership rule.
    async fn replace_service_spec(
        &self,
        key: &ObjectKey,
        website: &Website,
        desired: Service,
    ) -> Result<(), ControllerError> {
        let mut live = self.store.get_service(key).await?;
        ensure_controlled_by(&live.metadata, website, "Service", key)?;
        live.spec = desired.spec;
        self.store.update_service(&live).await?;
        Ok(())
    }

    async fn record_snapshot(&self, key: &ObjectKey, website: &mut Website) -> Result<(), ControllerError> {
        snapshot::write_snapshot(website)?;
        self.store.update_website(website).await?;
        debug!("Recorded last-applied spec on Website {}", key);
        Ok(())
    }
}

/// A dependent belongs to `website` only if it carries a controller owner
/// reference with the Website's UID.
fn ensure_controlled_by(
    meta: &ObjectMeta,
    website: &Website,
    kind: &str,
    key: &ObjectKey,
) -> Result<(), ControllerError> {
    let controlled = website.metadata.uid.as_deref().is_some_and(|uid| {
        meta.owner_references
            .iter()
            .flatten()
            .any(|owner| owner.uid == uid && owner.controller == Some(true))
    });
    if controlled {
        Ok(())
    } else {
        Err(ControllerError::NotOwned(format!("{kind} {key}")))
    }
}
