//! cuepkg - cluster package discovery and reconciliation
//!
//! This crate provides:
//! - **Registry clients**: a trait over a declarative object store, with a
//!   cluster-backed implementation (Kubernetes dynamic API + discovery)
//!   and an in-memory one for tests
//! - **Lister**: enumerate objects of a dynamically-typed kind, optionally
//!   scoped to one namespace, with classified errors when the kind is not
//!   installed
//! - **Upserter**: idempotent create-or-update with bounded retries on
//!   optimistic-concurrency conflicts
//! - **Packages**: the CueX `Package` (cue.oam.dev) descriptor and its
//!   description annotation
//!
//! The crate never prints or logs results; it returns structured errors
//! and objects for a presentation layer to render.

pub mod descriptor;
pub mod error;
pub mod lister;
pub mod object;
pub mod package;
pub mod registry;
pub mod upsert;

pub use descriptor::ResourceDescriptor;
pub use error::{RegistryError, Result};
pub use lister::{list_resources, list_resources_with_deadline, Filter};
pub use object::ResourceObject;
pub use package::{
    description, search_packages, PACKAGE_DESCRIPTION_KEY, PACKAGE_GROUP, PACKAGE_KIND,
    PACKAGE_VERSION,
};
pub use registry::{KubeRegistry, MockRegistry, OperationCounts, Registry};
pub use upsert::{upsert, upsert_with_deadline, UpsertOutcome};
