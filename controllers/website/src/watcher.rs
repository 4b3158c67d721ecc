//! kube-runtime callbacks.
//!
//! The runtime `Controller` owns watching, queueing and per-key ordering;
//! this module adapts its callbacks to `Reconciler::reconcile_website`.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crds::Website;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use resource_store::ObjectKey;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared state handed to every callback
#[derive(Debug)]
pub struct Context {
    pub reconciler: Reconciler,
    pub config: ControllerConfig,
}

/// Reconcile callback: re-reads the Website by key and converges its dependents.
pub async fn reconcile(website: Arc<Website>, ctx: Arc<Context>) -> Result<Action, ControllerError> {
    let key = ObjectKey::from_resource(website.as_ref())?;
    let outcome = ctx.reconciler.reconcile_website(&key).await?;
    info!("Reconciled Website {}: {:?}", key, outcome);
    Ok(next_action(outcome, &ctx.config))
}

/// Error callback: log and retry after a fixed delay.
pub fn error_policy(website: Arc<Website>, err: &ControllerError, ctx: Arc<Context>) -> Action {
    let name = website.name_any();
    let namespace = website.namespace().unwrap_or_default();
    if err.is_retryable() {
        warn!("Failed to reconcile Website {}/{}: {}, will retry", namespace, name, err);
    } else {
        error!("Failed to reconcile Website {}/{}: {} (needs attention)", namespace, name, err);
    }
    Action::requeue(ctx.config.error_requeue)
}

fn next_action(outcome: ReconcileOutcome, config: &ControllerConfig) -> Action {
    match outcome {
        ReconcileOutcome::WebsiteNotFound | ReconcileOutcome::WebsiteDeleting => Action::await_change(),
        ReconcileOutcome::Created | ReconcileOutcome::Unchanged | ReconcileOutcome::Updated => {
            Action::requeue(config.resync_interval)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use std::time::Duration;

    fn config() -> ControllerConfig {
        ControllerConfig {
            namespace: None,
            resync_interval: Duration::from_secs(300),
            error_requeue: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_gone_websites_wait_for_change() {
        assert_eq!(next_action(ReconcileOutcome::WebsiteNotFound, &config()), Action::await_change());
        assert_eq!(next_action(ReconcileOutcome::WebsiteDeleting, &config()), Action::await_change());
    }

    #[test]
    fn test_live_websites_resync() {
        let resync = Action::requeue(Duration::from_secs(300));
        assert_eq!(next_action(ReconcileOutcome::Created, &config()), resync);
        assert_eq!(next_action(ReconcileOutcome::Unchanged, &config()), resync);
        assert_eq!(next_action(ReconcileOutcome::Updated, &config()), resync);
    }

    #[tokio::test]
    async fn test_reconcile_callback_creates_dependents() {
        let (reconciler, store) = create_test_reconciler();
        let website = store.add_website(create_test_website("blog", "default", create_test_spec("nginx:1.27", 2)));
        let ctx = Arc::new(Context { reconciler, config: config() });

        let action = reconcile(Arc::new(website), ctx).await.unwrap();

        assert_eq!(action, Action::requeue(Duration::from_secs(300)));
        assert_eq!(store.deployment_count(), 1);
        assert_eq!(store.service_count(), 1);
    }

    #[test]
    fn test_error_policy_requeues_after_fixed_delay() {
        let (reconciler, _store) = create_test_reconciler();
        let ctx = Arc::new(Context { reconciler, config: config() });
        let website = Arc::new(create_test_website("blog", "default", create_test_spec("nginx:1.27", 2)));
        let err = ControllerError::Store(resource_store::StoreError::Conflict("Website default/blog".into()));

        assert_eq!(error_policy(website, &err, ctx), Action::requeue(Duration::from_secs(30)));
    }
}
