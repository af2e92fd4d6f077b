//! Listing resources of a dynamically-typed kind
//!
//! Queries the registry for every object of one kind, optionally scoped to
//! a single namespace, then narrows the result through caller-supplied
//! filters. Results come back in whatever order the registry returned
//! them; callers that need sorted output sort on their side.

use crate::descriptor::ResourceDescriptor;
use crate::error::{RegistryError, Result};
use crate::object::ResourceObject;
use crate::registry::Registry;

/// Predicate over a [`ResourceObject`]; filters are conjunctive
pub type Filter<'a> = &'a (dyn Fn(&ResourceObject) -> bool + Send + Sync);

/// List all objects of `descriptor`'s kind
///
/// `None` or `Some("")` for `namespace` enumerates across every namespace;
/// a non-empty value restricts to that namespace. An empty result is a
/// valid, empty Vec, not an error.
///
/// Fails with [`RegistryError::KindNotRegistered`] when the kind is not
/// installed on the registry, distinguishable from any other failure.
pub async fn list_resources<R: Registry + ?Sized>(
    registry: &R,
    descriptor: &ResourceDescriptor,
    namespace: Option<&str>,
    filters: &[Filter<'_>],
) -> Result<Vec<ResourceObject>> {
    let scope = namespace.filter(|ns| !ns.is_empty());
    let mut objects = registry.list(descriptor, scope).await?;

    for filter in filters {
        objects.retain(|obj| filter(obj));
    }

    Ok(objects)
}

/// [`list_resources`] bounded by a deadline
///
/// An elapsed deadline fails with [`RegistryError::Cancelled`]; the
/// registry's state is untouched because listing is read-only.
pub async fn list_resources_with_deadline<R: Registry + ?Sized>(
    registry: &R,
    descriptor: &ResourceDescriptor,
    namespace: Option<&str>,
    filters: &[Filter<'_>],
    deadline: std::time::Duration,
) -> Result<Vec<ResourceObject>> {
    tokio::time::timeout(
        deadline,
        list_resources(registry, descriptor, namespace, filters),
    )
    .await
    .map_err(|_| RegistryError::Cancelled {
        operation: "list",
        kind: descriptor.kind().to_string(),
    })?
}
