//! Dependent resource builders
//!
//! Pure projections of a Website into the Deployment and Service that serve
//! it. Both share the Website's namespace/name, carry a controller owner
//! reference back to it, and use `{app: <website-name>}` as labels and
//! selector so the Service routes to the Deployment's pods.

use crds::Website;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec, Service, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;

/// Label key shared by pod templates and selectors
pub const APP_LABEL: &str = "app";

const IMAGE_PULL_POLICY: &str = "IfNotPresent";
const SERVICE_TYPE: &str = "LoadBalancer";

/// `{app: <website-name>}`
pub fn selector_labels(website: &Website) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), website.name_any())])
}

/// Controller owner reference pointing at `website`.
///
/// Cascade deletion of dependents is left to the API server's garbage
/// collector, which follows this link.
pub fn owner_reference(website: &Website) -> OwnerReference {
    OwnerReference {
        api_version: Website::api_version(&()).into_owned(),
        kind: Website::kind(&()).into_owned(),
        name: website.name_any(),
        uid: website.metadata.uid.clone().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

fn dependent_metadata(website: &Website) -> ObjectMeta {
    ObjectMeta {
        name: Some(website.name_any()),
        namespace: website.namespace(),
        labels: Some(selector_labels(website)),
        owner_references: Some(vec![owner_reference(website)]),
        ..Default::default()
    }
}

/// Build the Deployment running `website`
pub fn build_deployment(website: &Website) -> Deployment {
    let labels = selector_labels(website);

    let container = Container {
        name: website.name_any(),
        image: Some(website.spec.image.clone()),
        resources: Some(website.spec.resources.clone()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
        ..Default::default()
    };

    Deployment {
        metadata: dependent_metadata(website),
        spec: Some(DeploymentSpec {
            replicas: Some(website.spec.replicas),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Build the LoadBalancer Service exposing `website`
pub fn build_service(website: &Website) -> Service {
    Service {
        metadata: dependent_metadata(website),
        spec: Some(ServiceSpec {
            type_: Some(SERVICE_TYPE.to_string()),
            ports: Some(website.spec.ports.clone()),
            selector: Some(selector_labels(website)),
            ..Default::default()
        }),
        ..Default::default()
    }
}
