//! Error types for cuepkg

use thiserror::Error;

/// Result type for cuepkg registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur when talking to the resource registry
///
/// Every failure from the registry is classified into one of these kinds
/// before it reaches a caller; the crate never logs or prints on its own.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The cluster has no resource type matching the descriptor's kind
    #[error("kind '{kind}' is not installed on the cluster")]
    KindNotRegistered { kind: String },

    /// No object at (descriptor, namespace, name)
    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    /// The registry's own schema checks rejected the object
    #[error("validation rejected {kind} '{name}': {message}")]
    Validation {
        kind: String,
        name: String,
        message: String,
    },

    /// Optimistic-concurrency rejection (stale revision token)
    #[error("conflicting write for {kind} '{name}' in namespace '{namespace}'")]
    Conflict {
        kind: String,
        namespace: String,
        name: String,
    },

    /// The caller's deadline elapsed before the call completed
    #[error("{operation} of {kind} cancelled before completion")]
    Cancelled {
        operation: &'static str,
        kind: String,
    },

    /// Any other Kubernetes API failure, wrapped with operation context
    #[error("failed to {operation} {kind}: {source}")]
    Api {
        operation: &'static str,
        kind: String,
        #[source]
        source: kube::Error,
    },

    /// Transport failure from a non-Kubernetes registry backend
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for RegistryError {
    fn from(e: serde_yaml::Error) -> Self {
        RegistryError::Serialization(e.to_string())
    }
}

impl RegistryError {
    /// Check if this is a missing-object error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    /// Check if this is an optimistic-concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, RegistryError::Conflict { .. })
    }

    /// Check if this is the not-installed classification for a kind
    pub fn is_kind_not_registered(&self) -> bool {
        matches!(self, RegistryError::KindNotRegistered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        let not_found = RegistryError::NotFound {
            kind: "Package".to_string(),
            namespace: "default".to_string(),
            name: "foo".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        let conflict = RegistryError::Conflict {
            kind: "Package".to_string(),
            namespace: "default".to_string(),
            name: "foo".to_string(),
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_kind_not_registered());

        let unknown_kind = RegistryError::KindNotRegistered {
            kind: "Package".to_string(),
        };
        assert!(unknown_kind.is_kind_not_registered());
        assert!(!unknown_kind.is_not_found());
    }

    #[test]
    fn test_messages_carry_identity() {
        let err = RegistryError::NotFound {
            kind: "Package".to_string(),
            namespace: "default".to_string(),
            name: "foo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Package"));
        assert!(msg.contains("foo"));
        assert!(msg.contains("default"));
    }

    #[test]
    fn test_kind_not_registered_names_kind() {
        let err = RegistryError::KindNotRegistered {
            kind: "Package".to_string(),
        };
        assert!(err.to_string().contains("'Package' is not installed"));
    }
}
