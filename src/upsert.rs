//! Idempotent create-or-update against the registry
//!
//! Upsert is the one mutating operation with a non-trivial contract: it is
//! a read-modify-write with no compare-and-swap of its own, relying on the
//! registry's revision token to reject lost updates. On such a rejection
//! the whole cycle is retried a bounded number of times before the
//! `Conflict` surfaces.

use crate::error::{RegistryError, Result};
use crate::object::ResourceObject;
use crate::registry::Registry;

/// Retries of the full read-modify-write cycle after a `Conflict`
const CONFLICT_RETRIES: u32 = 2;

/// Result of an upsert
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    /// The object as stored after the call, revision token included
    pub object: ResourceObject,
    /// Whether it was created (true) or updated (false)
    pub created: bool,
}

/// Ensure the registry's stored object matches `desired`
///
/// Creates the object if absent; otherwise overlays the desired spec and
/// annotations onto the existing object (keeping its identity and revision
/// token) and updates it. Exactly one object is created or updated per
/// successful call.
pub async fn upsert<R: Registry + ?Sized>(
    registry: &R,
    desired: &ResourceObject,
) -> Result<UpsertOutcome> {
    if desired.name.is_empty() {
        return Err(RegistryError::Validation {
            kind: desired.descriptor.kind().to_string(),
            name: String::new(),
            message: "metadata.name is required".to_string(),
        });
    }

    let mut attempt = 0;
    loop {
        let existing = match registry
            .get(&desired.descriptor, &desired.namespace, &desired.name)
            .await
        {
            Ok(existing) => Some(existing),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        let result = match existing {
            None => registry
                .create(desired)
                .await
                .map(|object| UpsertOutcome { object, created: true }),
            Some(existing) => {
                let merged = merge(existing, desired);
                registry
                    .update(&merged)
                    .await
                    .map(|object| UpsertOutcome { object, created: false })
            }
        };

        match result {
            Err(e) if e.is_conflict() && attempt < CONFLICT_RETRIES => {
                attempt += 1;
                tracing::debug!(
                    name = %desired.name,
                    namespace = %desired.namespace,
                    attempt,
                    "upsert lost a write race, retrying",
                );
            }
            other => return other,
        }
    }
}

/// [`upsert`] bounded by a deadline
///
/// An elapsed deadline fails with [`RegistryError::Cancelled`]. Creation
/// and update are each atomic registry operations, so cancellation never
/// leaves a partial write behind.
pub async fn upsert_with_deadline<R: Registry + ?Sized>(
    registry: &R,
    desired: &ResourceObject,
    deadline: std::time::Duration,
) -> Result<UpsertOutcome> {
    tokio::time::timeout(deadline, upsert(registry, desired))
        .await
        .map_err(|_| RegistryError::Cancelled {
            operation: "upsert",
            kind: desired.descriptor.kind().to_string(),
        })?
}

/// Overlay the desired payload and annotations onto the stored object
///
/// Identity and the registry's revision token come from `existing`;
/// annotations not mentioned by the caller are kept.
fn merge(existing: ResourceObject, desired: &ResourceObject) -> ResourceObject {
    let mut merged = existing;
    merged
        .annotations
        .extend(desired.annotations.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged.spec = desired.spec.clone();
    merged
}
