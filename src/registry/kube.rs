//! Cluster-backed registry implementation
//!
//! Resolves descriptors to API endpoints through discovery, so a kind that
//! is not installed on the cluster is classified as `KindNotRegistered`
//! before any request is sent.

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, ListParams, PostParams},
    discovery::{ApiCapabilities, ApiResource, Discovery, Scope},
};

use super::Registry;
use crate::descriptor::ResourceDescriptor;
use crate::error::{RegistryError, Result};
use crate::object::ResourceObject;

/// Registry backed by the Kubernetes API
pub struct KubeRegistry {
    client: Client,
    /// Cached discovery information
    discovery: Discovery,
}

impl KubeRegistry {
    /// Connect using the ambient kubeconfig / in-cluster config
    pub async fn new() -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Self::with_client(client).await
    }

    /// Create from an existing client, running discovery once
    pub async fn with_client(client: Client) -> Result<Self> {
        let discovery = Discovery::new(client.clone())
            .run()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("discovery failed: {}", e)))?;
        Ok(Self { client, discovery })
    }

    /// Refresh the discovery cache (call after CRD changes)
    pub async fn refresh_discovery(&mut self) -> Result<()> {
        tracing::debug!("refreshing API discovery cache");
        self.discovery = Discovery::new(self.client.clone())
            .run()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("discovery failed: {}", e)))?;
        Ok(())
    }

    /// Resolve a descriptor against discovery
    ///
    /// This is where the "no matching resource type" condition is detected
    /// and re-signaled with the descriptor's kind embedded.
    fn resolve(&self, descriptor: &ResourceDescriptor) -> Result<(ApiResource, ApiCapabilities)> {
        self.discovery
            .resolve_gvk(&descriptor.to_gvk())
            .ok_or_else(|| RegistryError::KindNotRegistered {
                kind: descriptor.kind().to_string(),
            })
    }

    fn api_for(
        &self,
        resource: &ApiResource,
        capabilities: &ApiCapabilities,
        namespace: Option<&str>,
    ) -> Api<DynamicObject> {
        match namespace {
            Some(ns) if !ns.is_empty() && capabilities.scope == Scope::Namespaced => {
                Api::namespaced_with(self.client.clone(), ns, resource)
            }
            _ => Api::all_with(self.client.clone(), resource),
        }
    }
}

#[async_trait]
impl Registry for KubeRegistry {
    async fn list(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
    ) -> Result<Vec<ResourceObject>> {
        let (resource, capabilities) = self.resolve(descriptor)?;
        let api = self.api_for(&resource, &capabilities, namespace);

        let objects = api
            .list(&ListParams::default())
            .await
            .map_err(|e| classify(e, "list", descriptor, namespace.unwrap_or(""), ""))?;

        objects
            .items
            .into_iter()
            .map(|item| ResourceObject::from_dynamic(item, descriptor))
            .collect()
    }

    async fn get(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<ResourceObject> {
        let (resource, capabilities) = self.resolve(descriptor)?;
        let api = self.api_for(&resource, &capabilities, Some(namespace));

        let object = api
            .get_opt(name)
            .await
            .map_err(|e| classify(e, "get", descriptor, namespace, name))?
            .ok_or_else(|| RegistryError::NotFound {
                kind: descriptor.kind().to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;

        ResourceObject::from_dynamic(object, descriptor)
    }

    async fn create(&self, object: &ResourceObject) -> Result<ResourceObject> {
        let (resource, capabilities) = self.resolve(&object.descriptor)?;
        let api = self.api_for(&resource, &capabilities, Some(&object.namespace));

        let created = api
            .create(&PostParams::default(), &object.to_dynamic())
            .await
            .map_err(|e| {
                classify(e, "create", &object.descriptor, &object.namespace, &object.name)
            })?;

        ResourceObject::from_dynamic(created, &object.descriptor)
    }

    async fn update(&self, object: &ResourceObject) -> Result<ResourceObject> {
        let (resource, capabilities) = self.resolve(&object.descriptor)?;
        let api = self.api_for(&resource, &capabilities, Some(&object.namespace));

        let updated = api
            .replace(&object.name, &PostParams::default(), &object.to_dynamic())
            .await
            .map_err(|e| {
                classify(e, "update", &object.descriptor, &object.namespace, &object.name)
            })?;

        ResourceObject::from_dynamic(updated, &object.descriptor)
    }

    async fn delete(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<()> {
        let (resource, capabilities) = self.resolve(descriptor)?;
        let api = self.api_for(&resource, &capabilities, Some(namespace));

        api.delete(name, &DeleteParams::default())
            .await
            .map_err(|e| classify(e, "delete", descriptor, namespace, name))?;

        Ok(())
    }
}

/// Classify an API failure into a registry error kind
///
/// A 404 on list means the whole collection is missing (the kind vanished
/// after discovery ran), so it keeps the `KindNotRegistered` classification
/// rather than `NotFound`.
fn classify(
    err: kube::Error,
    operation: &'static str,
    descriptor: &ResourceDescriptor,
    namespace: &str,
    name: &str,
) -> RegistryError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 && operation == "list" => {
            RegistryError::KindNotRegistered {
                kind: descriptor.kind().to_string(),
            }
        }
        kube::Error::Api(resp) if resp.code == 404 => RegistryError::NotFound {
            kind: descriptor.kind().to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(resp) if resp.code == 409 => RegistryError::Conflict {
            kind: descriptor.kind().to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(resp) if resp.code == 422 => RegistryError::Validation {
            kind: descriptor.kind().to_string(),
            name: name.to_string(),
            message: resp.message,
        },
        other => RegistryError::Api {
            operation,
            kind: descriptor.kind().to_string(),
            source: other,
        },
    }
}
