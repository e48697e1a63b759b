//! Log pipeline registration for cluster-side logging.
//!
//! Configurators register `tracing-subscriber` layers here; the runtime turns
//! the accumulated layers into the dispatcher its nodes log through. Layers
//! are applied in registration order.

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::Layer;

/// A registered log pipeline stage.
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Accumulates log pipeline layers during cluster configuration.
#[derive(Default)]
pub struct LoggingRegistry {
    layers: Vec<BoxedLayer>,
}

impl LoggingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer at the end of the pipeline.
    pub fn add_layer<L>(&mut self, layer: L)
    where
        L: Layer<Registry> + Send + Sync + 'static,
    {
        self.layers.push(Box::new(layer));
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether any layers have been registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Consume the registry and build the dispatcher the cluster logs through.
    pub fn into_dispatch(self) -> Dispatch {
        Dispatch::new(Registry::default().with(self.layers))
    }
}

impl std::fmt::Debug for LoggingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingRegistry")
            .field("layers", &self.layers.len())
            .finish()
    }
}
