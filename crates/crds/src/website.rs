//! Website CRD
//!
//! Declares a containerized website: the image to run, how many replicas,
//! their resource envelope and the ports exposed through a load balancer.
//! The controller derives a Deployment and a Service from it.

use k8s_openapi::api::core::v1::{ResourceRequirements, ServicePort};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "website.microscaler.io",
    version = "v1",
    kind = "Website",
    shortname = "ws",
    namespaced,
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".spec.image"}"#,
    printcolumn = r#"{"name":"Replicas","type":"integer","jsonPath":".spec.replicas"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteSpec {
    /// Container image reference (e.g. "nginx:1.27")
    pub image: String,

    /// Number of pod replicas
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Compute resource requests and limits for the website container
    #[serde(default)]
    pub resources: ResourceRequirements,

    /// Ports exposed by the LoadBalancer Service
    ///
    /// Order is significant: reordering ports counts as a spec change.
    #[serde(default)]
    pub ports: Vec<ServicePort>,
}

fn default_replicas() -> i32 {
    1
}
