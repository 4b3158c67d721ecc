//! Controller configuration loaded from environment variables.

use crate::error::ControllerError;
use std::env;
use std::time::Duration;

/// Periodic resync when nothing changes
const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 300;
/// Fixed delay before retrying a failed reconcile
const DEFAULT_ERROR_REQUEUE_SECS: u64 = 30;

/// Runtime settings for the Website Controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; `None` watches all namespaces
    pub namespace: Option<String>,
    /// Requeue delay after a successful reconcile
    pub resync_interval: Duration,
    /// Requeue delay after a failed reconcile
    pub error_requeue: Duration,
}

impl ControllerConfig {
    /// Read `WATCH_NAMESPACE`, `RESYNC_INTERVAL_SECS` and `ERROR_REQUEUE_SECS`
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());
        let resync_interval = seconds(&lookup, "RESYNC_INTERVAL_SECS", DEFAULT_RESYNC_INTERVAL_SECS)?;
        let error_requeue = seconds(&lookup, "ERROR_REQUEUE_SECS", DEFAULT_ERROR_REQUEUE_SECS)?;

        Ok(Self {
            namespace,
            resync_interval,
            error_requeue,
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ControllerError> {
    match lookup(key) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => Err(ControllerError::InvalidConfig(format!("{key} must be greater than zero"))),
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(e) => Err(ControllerError::InvalidConfig(format!(
                "{key}={raw:?} is not a number of seconds: {e}"
            ))),
        },
    }
}
