//! Resource Store
//!
//! The narrow slice of the Kubernetes API the website controller needs:
//! fetch an object by namespace/name, create it, or replace it.
//!
//! # Example
//!
//! ```no_run
//! use resource_store::{KubeStore, ObjectKey, ResourceStore, StoreError};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let store = KubeStore::new(client);
//!
//! let key = ObjectKey::new("default", "blog");
//! match store.get_website(&key).await {
//!     Ok(website) => println!("image: {}", website.spec.image),
//!     Err(StoreError::NotFound(_)) => println!("{key} is gone"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The `test-util` feature adds [`MockResourceStore`], an in-memory
//! implementation with optimistic concurrency and failure injection.

pub mod error;
pub mod key;
pub mod kube_store;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use error::StoreError;
pub use key::ObjectKey;
pub use kube_store::KubeStore;
pub use store_trait::ResourceStore;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockResourceStore, StoreOp};
