//! Test utilities for unit testing the reconciler
//!
//! This module provides helpers for creating test data and setting up test scenarios.

use crate::reconciler::Reconciler;
use crds::{Website, WebsiteSpec};
use k8s_openapi::api::core::v1::{ResourceRequirements, ServicePort};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use resource_store::{MockResourceStore, ObjectKey};
use std::collections::BTreeMap;

/// Helper to create a named TCP port forwarding to the same container port
pub fn test_port(name: &str, port: i32) -> ServicePort {
    ServicePort {
        name: Some(name.to_string()),
        port,
        protocol: Some("TCP".to_string()),
        target_port: Some(IntOrString::Int(port)),
        ..Default::default()
    }
}

/// Helper to create a spec with one HTTP port and small requests/limits
pub fn create_test_spec(image: &str, replicas: i32) -> WebsiteSpec {
    WebsiteSpec {
        image: image.to_string(),
        replicas,
        resources: ResourceRequirements {
            requests: Some(BTreeMap::from([
                ("cpu".to_string(), Quantity("100m".to_string())),
                ("memory".to_string(), Quantity("64Mi".to_string())),
            ])),
            limits: Some(BTreeMap::from([("memory".to_string(), Quantity("128Mi".to_string()))])),
            ..Default::default()
        },
        ports: vec![test_port("http", 80)],
    }
}

/// Helper to create test Website CRD
pub fn create_test_website(name: &str, namespace: &str, spec: WebsiteSpec) -> Website {
    Website {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec,
    }
}

/// Helper to create a Website that carries a deletionTimestamp
pub fn create_deleting_website(name: &str, namespace: &str, spec: WebsiteSpec) -> Website {
    let mut value = serde_json::to_value(create_test_website(name, namespace, spec)).unwrap();
    value["metadata"]["deletionTimestamp"] = serde_json::json!("2025-01-01T00:00:00Z");
    value["metadata"]["finalizers"] = serde_json::json!(["example.com/hold"]);
    serde_json::from_value(value).unwrap()
}

/// Key shared by a Website and its dependents
pub fn test_key(name: &str, namespace: &str) -> ObjectKey {
    ObjectKey::new(namespace, name)
}

/// Helper to create a reconciler over a mock store; the returned store
/// shares state with the one inside the reconciler
pub fn create_test_reconciler() -> (Reconciler, MockResourceStore) {
    let store = MockResourceStore::new();
    let reconciler = Reconciler::new(Box::new(store.clone()));
    (reconciler, store)
}
