//! Entity registry collecting the routes of every record kind

use super::state::AppState;
use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
///
/// Each routed record kind (Auto, Partner) implements this trait to provide
/// its list and detail routes.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (e.g., "auto")
    fn entity_type(&self) -> &str;

    /// Collection path, with its trailing slash (e.g., "/auto/")
    fn collection_path(&self) -> String {
        format!("/{}/", self.entity_type())
    }

    /// Detail path template (e.g., "/auto/{id}/")
    fn detail_path(&self) -> String {
        format!("{}{{id}}/", self.collection_path())
    }

    /// Build the routes for this entity
    fn build_routes(&self) -> Router<AppState>;
}

/// Registry for all routed entities
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is the key; registering it again replaces it.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router<AppState> {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, in name order
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDescriptor(&'static str);

    impl EntityDescriptor for MockDescriptor {
        fn entity_type(&self) -> &str {
            self.0
        }

        fn build_routes(&self) -> Router<AppState> {
            Router::new()
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        assert!(EntityRegistry::new().entity_types().is_empty());
    }

    #[test]
    fn test_register_multiple_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(MockDescriptor("partner")));
        registry.register(Box::new(MockDescriptor("auto")));
        assert_eq!(registry.entity_types(), ["auto", "partner"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(MockDescriptor("auto")));
        registry.register(Box::new(MockDescriptor("auto")));
        assert_eq!(registry.entity_types().len(), 1);
    }

    #[test]
    fn test_default_paths() {
        let descriptor = MockDescriptor("auto");
        assert_eq!(descriptor.collection_path(), "/auto/");
        assert_eq!(descriptor.detail_path(), "/auto/{id}/");
    }
}
