//! Prints the CRD manifests for every custom resource in this crate.
//!
//! Usage: `cargo run -p crds --bin crdgen > deploy/crds.yaml`

use anyhow::Result;
use crds::Website;
use kube::CustomResourceExt;

fn main() -> Result<()> {
    print!("{}", serde_yaml::to_string(&Website::crd())?);
    Ok(())
}
