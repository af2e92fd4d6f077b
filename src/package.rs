//! CueX Package resources
//!
//! Packages live in the `cue.oam.dev` API group and carry their
//! human-readable description in the `package.oam.dev/description`
//! annotation.

use crate::descriptor::ResourceDescriptor;
use crate::error::Result;
use crate::lister::{list_resources, Filter};
use crate::object::ResourceObject;
use crate::registry::Registry;

/// API group of Package resources
pub const PACKAGE_GROUP: &str = "cue.oam.dev";

/// API version of Package resources
pub const PACKAGE_VERSION: &str = "v1alpha1";

/// Kind of Package resources
pub const PACKAGE_KIND: &str = "Package";

/// Annotation carrying a package's human-readable description
pub const PACKAGE_DESCRIPTION_KEY: &str = "package.oam.dev/description";

impl ResourceDescriptor {
    /// Descriptor for CueX Package resources
    pub fn package() -> Self {
        ResourceDescriptor::new(PACKAGE_GROUP, PACKAGE_VERSION, PACKAGE_KIND)
    }
}

/// Search the registry for Package objects
///
/// An empty namespace searches every namespace. Additional filters narrow
/// the result set; none are applied by default.
pub async fn search_packages<R: Registry + ?Sized>(
    registry: &R,
    namespace: Option<&str>,
    filters: &[Filter<'_>],
) -> Result<Vec<ResourceObject>> {
    list_resources(registry, &ResourceDescriptor::package(), namespace, filters).await
}

/// A package's description annotation, if set
pub fn description(object: &ResourceObject) -> Option<&str> {
    object.annotation(PACKAGE_DESCRIPTION_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MockRegistry;

    #[test]
    fn test_package_descriptor() {
        let d = ResourceDescriptor::package();
        assert_eq!(d.group(), "cue.oam.dev");
        assert_eq!(d.version(), "v1alpha1");
        assert_eq!(d.kind(), "Package");
        assert_eq!(d.list_kind(), "PackageList");
    }

    #[test]
    fn test_description() {
        let obj = ResourceObject::new(ResourceDescriptor::package(), "default", "foo")
            .with_annotation(PACKAGE_DESCRIPTION_KEY, "utility helpers");
        assert_eq!(description(&obj), Some("utility helpers"));

        let bare = ResourceObject::new(ResourceDescriptor::package(), "default", "bare");
        assert_eq!(description(&bare), None);
    }

    #[tokio::test]
    async fn test_search_packages() {
        let registry = MockRegistry::new().with_kind(&ResourceDescriptor::package());
        registry
            .create(&ResourceObject::new(
                ResourceDescriptor::package(),
                "default",
                "foo",
            ))
            .await
            .unwrap();

        let packages = search_packages(&registry, Some("default"), &[]).await.unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "foo");
    }
}
