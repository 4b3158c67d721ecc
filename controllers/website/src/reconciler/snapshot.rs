//! Last-applied spec snapshot
//!
//! The spec the controller last acted on is stored as JSON under the
//! `spec` annotation of the Website itself. Drift is any difference between
//! that snapshot and the current spec; live Deployments and Services are
//! never diffed field by field.

use crds::{Website, WebsiteSpec};
use std::collections::BTreeMap;

/// Annotation key holding the last-applied spec
pub const SPEC_ANNOTATION: &str = "spec";

/// Serialize a spec to its canonical snapshot form.
///
/// Fields are written in declaration order and resource quantities live in
/// `BTreeMap`s, so equal specs always produce identical strings.
pub fn encode_spec(spec: &WebsiteSpec) -> Result<String, serde_json::Error> {
    serde_json::to_string(spec)
}

/// Parse a snapshot back into a spec
pub fn decode_spec(raw: &str) -> Result<WebsiteSpec, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Whole-value comparison: any field change, including port order, is drift
pub fn spec_changed(last_applied: &WebsiteSpec, current: &WebsiteSpec) -> bool {
    last_applied != current
}

/// Decode the snapshot stored on `website`.
///
/// Returns `Ok(None)` when the annotation is absent and an error when it is
/// present but malformed.
pub fn read_snapshot(website: &Website) -> Result<Option<WebsiteSpec>, serde_json::Error> {
    website
        .metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(SPEC_ANNOTATION))
        .map(|raw| decode_spec(raw.as_str()))
        .transpose()
}

/// Store the current spec of `website` as its snapshot, creating the
/// annotation map if needed. Other annotations are left alone.
pub fn write_snapshot(website: &mut Website) -> Result<(), serde_json::Error> {
    let encoded = encode_spec(&website.spec)?;
    website
        .metadata
        .annotations
        .get_or_insert_with(BTreeMap::new)
        .insert(SPEC_ANNOTATION.to_string(), encoded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use k8s_openapi::api::core::v1::{ResourceRequirements, ServicePort};

    #[test]
    fn test_round_trip_minimal_spec() {
        // No ports, no resource requirements
        let spec = WebsiteSpec {
            image: "nginx:1.27".to_string(),
            replicas: 0,
            resources: ResourceRequirements::default(),
            ports: vec![],
        };
        let decoded = decode_spec(&encode_spec(&spec).unwrap()).unwrap();
        assert_eq!(decoded, spec);
    }

    #[test]
    fn test_round_trip_full_spec() {
        let spec = create_test_spec("ghcr.io/acme/site:2.1", 3);
        let encoded = encode_spec(&spec).unwrap();
        assert_eq!(decode_spec(&encoded).unwrap(), spec);
        // Canonical: encoding twice gives the same bytes
        assert_eq!(encode_spec(&decode_spec(&encoded).unwrap()).unwrap(), encoded);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_spec("not json").is_err());
        assert!(decode_spec(r#"{"replicas": 2}"#).is_err(), "image is required");
    }

    #[test]
    fn test_spec_changed_detects_each_field() {
        let base = create_test_spec("nginx:1.27", 2);
        assert!(!spec_changed(&base, &base.clone()));

        let mut replicas = base.clone();
        replicas.replicas = 5;
        assert!(spec_changed(&base, &replicas));

        let mut image = base.clone();
        image.image = "nginx:1.28".to_string();
        assert!(spec_changed(&base, &image));

        let mut resources = base.clone();
        resources.resources = ResourceRequirements::default();
        assert!(spec_changed(&base, &resources));
    }

    #[test]
    fn test_port_order_is_drift() {
        let mut spec = create_test_spec("nginx:1.27", 1);
        spec.ports = vec![test_port("http", 80), test_port("https", 443)];
        let mut reordered = spec.clone();
        reordered.ports = vec![test_port("https", 443), test_port("http", 80)];
        assert!(spec_changed(&spec, &reordered));
    }

    #[test]
    fn test_read_snapshot_absent() {
        let website = create_test_website("blog", "default", create_test_spec("nginx:1.27", 1));
        assert_eq!(read_snapshot(&website).unwrap(), None);
    }

    #[test]
    fn test_read_snapshot_malformed() {
        let mut website = create_test_website("blog", "default", create_test_spec("nginx:1.27", 1));
        website.metadata.annotations = Some(BTreeMap::from([(
            SPEC_ANNOTATION.to_string(),
            "{broken".to_string(),
        )]));
        assert!(read_snapshot(&website).is_err());
    }

    #[test]
    fn test_write_then_read_snapshot_keeps_other_annotations() {
        let mut website = create_test_website("blog", "default", create_test_spec("nginx:1.27", 2));
        website.metadata.annotations = Some(BTreeMap::from([(
            "team".to_string(),
            "web".to_string(),
        )]));

        write_snapshot(&mut website).unwrap();

        let annotations = website.metadata.annotations.as_ref().unwrap();
        assert_eq!(annotations.get("team").map(String::as_str), Some("web"));
        assert_eq!(read_snapshot(&website).unwrap(), Some(website.spec.clone()));
    }

    #[test]
    fn test_write_snapshot_creates_annotation_map() {
        let mut website = create_test_website("blog", "default", create_test_spec("nginx:1.27", 2));
        assert!(website.metadata.annotations.is_none());

        write_snapshot(&mut website).unwrap();
        assert_eq!(website.metadata.annotations.as_ref().map(BTreeMap::len), Some(1));
    }

    #[test]
    fn test_snapshot_of_port_keeps_target_port() {
        let port = ServicePort {
            name: Some("http".to_string()),
            port: 80,
            target_port: Some(k8s_openapi::apimachinery::pkg::util::intstr::IntOrString::String(
                "web".to_string(),
            )),
            ..Default::default()
        };
        let mut spec = create_test_spec("nginx:1.27", 1);
        spec.ports = vec![port];
        assert_eq!(decode_spec(&encode_spec(&spec).unwrap()).unwrap(), spec);
    }
}
