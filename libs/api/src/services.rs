//! Singleton service registration and typed lookup.
//!
//! The cluster runtime exposes a dependency-injection surface to
//! configurators. The harness consumes only the singleton slice of it: a
//! type-keyed map where each type has at most one shared instance. Services
//! registered here are resolvable both during configuration and from the
//! running cluster.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-keyed singleton registry.
///
/// Registering a second instance of the same type replaces the first, which
/// mirrors last-registration-wins semantics of the runtime's container.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared singleton instance of `T`.
    pub fn register_singleton<T: Any + Send + Sync>(&mut self, value: Arc<T>) {
        self.entries.insert(TypeId::of::<T>(), value);
    }

    /// Resolve the singleton registered for `T`, if any.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    /// Whether a singleton of type `T` has been registered.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered singletons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Settings {
        name: String,
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ServiceRegistry::new();
        registry.register_singleton(Arc::new(Settings {
            name: "test".to_string(),
        }));

        let resolved = registry.get::<Settings>().unwrap();
        assert_eq!(resolved.name, "test");
        assert!(registry.contains::<Settings>());
    }

    #[test]
    fn test_missing_type_resolves_none() {
        let registry = ServiceRegistry::new();
        assert!(registry.get::<Settings>().is_none());
        assert!(!registry.contains::<Settings>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ServiceRegistry::new();
        registry.register_singleton(Arc::new(Settings {
            name: "first".to_string(),
        }));
        registry.register_singleton(Arc::new(Settings {
            name: "second".to_string(),
        }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get::<Settings>().unwrap().name, "second");
    }

    #[test]
    fn test_singleton_is_shared() {
        let mut registry = ServiceRegistry::new();
        let original = Arc::new(Settings {
            name: "shared".to_string(),
        });
        registry.register_singleton(Arc::clone(&original));

        let resolved = registry.get::<Settings>().unwrap();
        assert!(Arc::ptr_eq(&original, &resolved));
    }
}
