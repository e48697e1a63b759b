//! Fluent registration of in-memory providers.
//!
//! Accumulates named storage and event-stream provider registrations and
//! replays them against the builder at configure time, in registration
//! order. Registrations are not deduplicated; registering the same name
//! twice replays it twice.

use silotest_api::{ClusterBuilder, ClusterError, ConfigureCluster};

#[derive(Debug, Clone)]
enum Registration {
    Storage(String),
    Streams(String),
}

/// Base cluster configuration backed entirely by in-memory providers.
///
/// ```no_run
/// use silotest_harness::memory::MemoryClusterConfigurator;
///
/// let base = MemoryClusterConfigurator::new()
///     .with_memory_storage("inventory")
///     .with_memory_streams("events");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryClusterConfigurator {
    registrations: Vec<Registration>,
}

impl MemoryClusterConfigurator {
    /// Start with no providers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named in-memory actor-storage provider.
    ///
    /// Panics on a blank name; provider names are fixed at authoring time,
    /// so a blank one is a programming error.
    pub fn with_memory_storage(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(
            !name.trim().is_empty(),
            "memory storage provider name must not be blank"
        );
        self.registrations.push(Registration::Storage(name));
        self
    }

    /// Register a named in-memory event-stream provider.
    ///
    /// Panics on a blank name.
    pub fn with_memory_streams(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(
            !name.trim().is_empty(),
            "memory stream provider name must not be blank"
        );
        self.registrations.push(Registration::Streams(name));
        self
    }

    /// Number of accumulated registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no providers have been registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl ConfigureCluster for MemoryClusterConfigurator {
    fn configure(&self, builder: &mut dyn ClusterBuilder) -> Result<(), ClusterError> {
        for registration in &self.registrations {
            match registration {
                Registration::Storage(name) => builder.add_memory_storage(name),
                Registration::Streams(name) => builder.add_memory_streams(name),
            }
        }
        Ok(())
    }
}
