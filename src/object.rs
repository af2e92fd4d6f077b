//! Self-describing registry objects
//!
//! A [`ResourceObject`] carries everything needed to address and store one
//! object: its type descriptor, identity (namespace + name), annotations,
//! and an opaque spec payload that this crate never interprets.

use std::collections::BTreeMap;

use kube::api::DynamicObject;
use kube::core::ApiResource;
use serde_json::Value;

use crate::descriptor::ResourceDescriptor;
use crate::error::{RegistryError, Result};

/// A single object as stored in the registry
///
/// (descriptor, namespace, name) uniquely identifies the object; the
/// registry enforces that uniqueness, not this type. `resource_version` is
/// the registry-assigned revision token used for optimistic concurrency
/// and must be preserved across read-modify-write cycles.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResourceObject {
    /// Type of this object
    pub descriptor: ResourceDescriptor,
    /// Namespace; empty means cluster-scoped or unspecified
    pub namespace: String,
    /// Name, unique within (descriptor, namespace)
    pub name: String,
    /// Auxiliary string metadata (e.g. a human-readable description)
    pub annotations: BTreeMap<String, String>,
    /// Opaque structured payload, not interpreted by this crate
    pub spec: Value,
    /// Registry-assigned revision token; None before first write
    pub resource_version: Option<String>,
}

impl ResourceObject {
    /// Create an object with an empty spec and no annotations
    pub fn new(
        descriptor: ResourceDescriptor,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            namespace: namespace.into(),
            name: name.into(),
            annotations: BTreeMap::new(),
            spec: Value::Null,
            resource_version: None,
        }
    }

    /// Replace the spec payload
    pub fn with_spec(mut self, spec: Value) -> Self {
        self.spec = spec;
        self
    }

    /// Add one annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Look up an annotation value
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Parse a single YAML manifest document into a ResourceObject
    ///
    /// The document must carry apiVersion, kind, and metadata.name.
    pub fn from_yaml(doc: &str) -> Result<Self> {
        let obj: DynamicObject = serde_yaml::from_str(doc)
            .map_err(|e| RegistryError::Serialization(format!("YAML parse error: {}", e)))?;
        let types = obj.types.clone().ok_or_else(|| {
            RegistryError::Serialization("object missing apiVersion or kind".to_string())
        })?;
        let descriptor = ResourceDescriptor::from_api_version(&types.api_version, &types.kind);
        Self::from_dynamic(obj, &descriptor)
    }

    /// Convert a dynamically-typed API object into a ResourceObject
    ///
    /// Items in list responses carry no apiVersion/kind of their own, so
    /// `descriptor` supplies the type when the object's own TypeMeta is
    /// absent.
    pub(crate) fn from_dynamic(obj: DynamicObject, descriptor: &ResourceDescriptor) -> Result<Self> {
        let descriptor = match obj.types.as_ref() {
            Some(types) => ResourceDescriptor::from_api_version(&types.api_version, &types.kind),
            None => descriptor.clone(),
        };

        let name = obj.metadata.name.clone().ok_or_else(|| {
            RegistryError::Serialization("object missing metadata.name".to_string())
        })?;

        Ok(Self {
            descriptor,
            namespace: obj.metadata.namespace.clone().unwrap_or_default(),
            name,
            annotations: obj.metadata.annotations.clone().unwrap_or_default(),
            spec: obj.data.get("spec").cloned().unwrap_or(Value::Null),
            resource_version: obj.metadata.resource_version.clone(),
        })
    }

    /// Convert into the dynamically-typed form the API client consumes
    pub(crate) fn to_dynamic(&self) -> DynamicObject {
        let ar = ApiResource::from_gvk(&self.descriptor.to_gvk());
        let mut obj = DynamicObject::new(&self.name, &ar);

        if !self.namespace.is_empty() {
            obj = obj.within(&self.namespace);
        }
        if !self.annotations.is_empty() {
            obj.metadata.annotations = Some(self.annotations.clone());
        }
        obj.metadata.resource_version = self.resource_version.clone();
        obj.data = serde_json::json!({ "spec": self.spec });

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn package_descriptor() -> ResourceDescriptor {
        ResourceDescriptor::new("cue.oam.dev", "v1alpha1", "Package")
    }

    #[test]
    fn test_builder() {
        let obj = ResourceObject::new(package_descriptor(), "default", "foo")
            .with_annotation("package.oam.dev/description", "test")
            .with_spec(json!({"path": "ext/utils"}));

        assert_eq!(obj.namespace, "default");
        assert_eq!(obj.name, "foo");
        assert_eq!(obj.annotation("package.oam.dev/description"), Some("test"));
        assert_eq!(obj.spec["path"], "ext/utils");
        assert!(obj.resource_version.is_none());
    }

    #[test]
    fn test_from_yaml() {
        let doc = r#"
apiVersion: cue.oam.dev/v1alpha1
kind: Package
metadata:
  name: foo
  namespace: default
  annotations:
    package.oam.dev/description: "utility helpers"
spec:
  path: ext/utils
  provider:
    protocol: http
    endpoint: http://httpserverurl:5000
"#;
        let obj = ResourceObject::from_yaml(doc).unwrap();
        assert_eq!(obj.descriptor, package_descriptor());
        assert_eq!(obj.name, "foo");
        assert_eq!(obj.namespace, "default");
        assert_eq!(
            obj.annotation("package.oam.dev/description"),
            Some("utility helpers")
        );
        assert_eq!(obj.spec["provider"]["protocol"], "http");
    }

    #[test]
    fn test_from_yaml_missing_name_fails() {
        let doc = r#"
apiVersion: cue.oam.dev/v1alpha1
kind: Package
metadata:
  namespace: default
spec: {}
"#;
        let result = ResourceObject::from_yaml(doc);
        assert!(matches!(result, Err(RegistryError::Serialization(_))));
    }

    #[test]
    fn test_from_yaml_missing_type_meta_fails() {
        let doc = r#"
metadata:
  name: foo
spec: {}
"#;
        let result = ResourceObject::from_yaml(doc);
        assert!(matches!(result, Err(RegistryError::Serialization(_))));
    }

    #[test]
    fn test_dynamic_round_trip() {
        let obj = ResourceObject::new(package_descriptor(), "default", "foo")
            .with_annotation("package.oam.dev/description", "test")
            .with_spec(json!({"templates": {"utils.cue": "package utils"}}));

        let dynamic = obj.to_dynamic();
        assert_eq!(dynamic.metadata.name.as_deref(), Some("foo"));
        assert_eq!(dynamic.metadata.namespace.as_deref(), Some("default"));

        let back = ResourceObject::from_dynamic(dynamic, &package_descriptor()).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_from_dynamic_without_type_meta_uses_descriptor() {
        // List response items carry no apiVersion/kind
        let mut dynamic = ResourceObject::new(package_descriptor(), "default", "foo").to_dynamic();
        dynamic.types = None;

        let obj = ResourceObject::from_dynamic(dynamic, &package_descriptor()).unwrap();
        assert_eq!(obj.descriptor, package_descriptor());
    }

    #[test]
    fn test_serializes_for_rendering() {
        let obj = ResourceObject::new(package_descriptor(), "default", "foo")
            .with_spec(json!({"path": "ext/utils"}));

        let json = serde_json::to_string(&obj).unwrap();
        assert!(json.contains("\"name\":\"foo\""));
        assert!(json.contains("ext/utils"));
    }

    #[test]
    fn test_to_dynamic_cluster_scoped() {
        let obj = ResourceObject::new(package_descriptor(), "", "foo");
        let dynamic = obj.to_dynamic();
        assert!(dynamic.metadata.namespace.is_none());
        assert!(dynamic.metadata.annotations.is_none());
    }

    #[test]
    fn test_to_dynamic_preserves_revision_token() {
        let mut obj = ResourceObject::new(package_descriptor(), "default", "foo");
        obj.resource_version = Some("42".to_string());

        let dynamic = obj.to_dynamic();
        assert_eq!(dynamic.metadata.resource_version.as_deref(), Some("42"));
    }
}
