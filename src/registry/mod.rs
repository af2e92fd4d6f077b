//! Registry client capability
//!
//! Everything this crate does goes through the [`Registry`] trait: list,
//! get, create, update, and delete against a declarative object store.
//! [`KubeRegistry`] talks to a real cluster; [`MockRegistry`] is an
//! in-memory stand-in with genuine optimistic-concurrency semantics so the
//! conflict paths can be tested without a cluster.

mod kube;
mod mock;

pub use self::kube::KubeRegistry;
pub use self::mock::{MockRegistry, OperationCounts};

use async_trait::async_trait;

use crate::descriptor::ResourceDescriptor;
use crate::error::Result;
use crate::object::ResourceObject;

/// Client capability over a declarative object registry
///
/// Implementations must be Send + Sync for use across async tasks.
/// Failures are classified into [`crate::RegistryError`] kinds by the
/// implementation, where the underlying error is visible.
#[async_trait]
pub trait Registry: Send + Sync {
    /// List all objects of a kind, optionally scoped to one namespace
    ///
    /// `None` (or `Some("")`) enumerates across every namespace. An empty
    /// result is not an error. Fails with `KindNotRegistered` when the
    /// descriptor's kind is not installed.
    async fn list(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
    ) -> Result<Vec<ResourceObject>>;

    /// Fetch one object; fails with `NotFound` when absent
    async fn get(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<ResourceObject>;

    /// Create a new object, returning it with its assigned revision token
    ///
    /// Fails with `Conflict` when the identity already exists.
    async fn create(&self, object: &ResourceObject) -> Result<ResourceObject>;

    /// Update an existing object
    ///
    /// The object's revision token must match the stored one; a stale
    /// token fails with `Conflict`.
    async fn update(&self, object: &ResourceObject) -> Result<ResourceObject>;

    /// Delete one object; fails with `NotFound` when absent
    async fn delete(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<()>;

    /// Check whether an object exists
    async fn exists(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<bool> {
        match self.get(descriptor, namespace, name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
