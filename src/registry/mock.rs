//! In-memory registry for testing
//!
//! Stores objects in memory with the same optimistic-concurrency contract
//! as the real registry: every write assigns a fresh revision token, and
//! an update carrying a stale token is rejected with `Conflict`. Useful
//! for unit tests without requiring a cluster.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::Registry;
use crate::descriptor::ResourceDescriptor;
use crate::error::{RegistryError, Result};
use crate::object::ResourceObject;

/// Storage key: (descriptor, namespace, name)
type ObjectKey = (ResourceDescriptor, String, String);

/// In-memory registry implementation for testing
#[derive(Clone, Default)]
pub struct MockRegistry {
    store: Arc<RwLock<HashMap<ObjectKey, ResourceObject>>>,
    /// Kinds "installed" on this registry; anything else is unresolvable
    kinds: Arc<RwLock<HashSet<ResourceDescriptor>>>,
    /// Monotonic revision counter backing resource_version assignment
    revision: Arc<AtomicU64>,
    /// Pending forced update conflicts (fault injection)
    forced_conflicts: Arc<AtomicUsize>,
    /// Artificial delay applied to every operation
    latency: Arc<RwLock<Option<Duration>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub gets: usize,
    pub lists: usize,
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl MockRegistry {
    /// Create a new empty registry with no kinds installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind, making it resolvable
    pub fn register_kind(&self, descriptor: &ResourceDescriptor) {
        self.kinds.write().unwrap().insert(descriptor.clone());
    }

    /// Builder form of [`register_kind`](Self::register_kind)
    pub fn with_kind(self, descriptor: &ResourceDescriptor) -> Self {
        self.register_kind(descriptor);
        self
    }

    /// Force the next `count` updates to fail with `Conflict`
    pub fn inject_conflicts(&self, count: usize) {
        self.forced_conflicts.store(count, Ordering::SeqCst);
    }

    /// Delay every operation by `latency` (for deadline tests)
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write().unwrap() = Some(latency);
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Count stored objects
    pub fn object_count(&self) -> usize {
        self.store.read().unwrap().len()
    }

    fn next_revision(&self) -> String {
        self.revision.fetch_add(1, Ordering::SeqCst).to_string()
    }

    fn check_kind(&self, descriptor: &ResourceDescriptor) -> Result<()> {
        if self.kinds.read().unwrap().contains(descriptor) {
            Ok(())
        } else {
            Err(RegistryError::KindNotRegistered {
                kind: descriptor.kind().to_string(),
            })
        }
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().unwrap();
        if let Some(d) = latency {
            tokio::time::sleep(d).await;
        }
    }

    fn take_forced_conflict(&self) -> bool {
        self.forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn list(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
    ) -> Result<Vec<ResourceObject>> {
        self.simulate_latency().await;
        self.operations.write().unwrap().lists += 1;
        self.check_kind(descriptor)?;

        let scope = namespace.filter(|ns| !ns.is_empty());
        let store = self.store.read().unwrap();
        Ok(store
            .iter()
            .filter(|((d, ns, _), _)| {
                d == descriptor && scope.map(|want| want == ns.as_str()).unwrap_or(true)
            })
            .map(|(_, obj)| obj.clone())
            .collect())
    }

    async fn get(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<ResourceObject> {
        self.simulate_latency().await;
        self.operations.write().unwrap().gets += 1;
        self.check_kind(descriptor)?;

        let key = (
            descriptor.clone(),
            namespace.to_string(),
            name.to_string(),
        );
        self.store
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind: descriptor.kind().to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create(&self, object: &ResourceObject) -> Result<ResourceObject> {
        self.simulate_latency().await;
        self.operations.write().unwrap().creates += 1;
        self.check_kind(&object.descriptor)?;

        if object.name.is_empty() {
            return Err(RegistryError::Validation {
                kind: object.descriptor.kind().to_string(),
                name: object.name.clone(),
                message: "metadata.name is required".to_string(),
            });
        }

        let key = (
            object.descriptor.clone(),
            object.namespace.clone(),
            object.name.clone(),
        );
        let mut store = self.store.write().unwrap();
        if store.contains_key(&key) {
            return Err(RegistryError::Conflict {
                kind: object.descriptor.kind().to_string(),
                namespace: object.namespace.clone(),
                name: object.name.clone(),
            });
        }

        let mut stored = object.clone();
        stored.resource_version = Some(self.next_revision());
        store.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, object: &ResourceObject) -> Result<ResourceObject> {
        self.simulate_latency().await;
        self.operations.write().unwrap().updates += 1;
        self.check_kind(&object.descriptor)?;

        let conflict = || RegistryError::Conflict {
            kind: object.descriptor.kind().to_string(),
            namespace: object.namespace.clone(),
            name: object.name.clone(),
        };

        if self.take_forced_conflict() {
            return Err(conflict());
        }

        let key = (
            object.descriptor.clone(),
            object.namespace.clone(),
            object.name.clone(),
        );
        let mut store = self.store.write().unwrap();
        let stored = store.get_mut(&key).ok_or_else(|| RegistryError::NotFound {
            kind: object.descriptor.kind().to_string(),
            namespace: object.namespace.clone(),
            name: object.name.clone(),
        })?;

        // Stale or missing revision token is rejected, as the real
        // registry would
        if object.resource_version != stored.resource_version {
            return Err(conflict());
        }

        let mut updated = object.clone();
        updated.resource_version = Some(self.next_revision());
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<()> {
        self.simulate_latency().await;
        self.operations.write().unwrap().deletes += 1;
        self.check_kind(descriptor)?;

        let key = (
            descriptor.clone(),
            namespace.to_string(),
            name.to_string(),
        );
        self.store
            .write()
            .unwrap()
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound {
                kind: descriptor.kind().to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}
