//! Website Operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the website controller.

pub mod website;

pub use website::*;
