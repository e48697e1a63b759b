//! Cluster builder and handle traits.
//!
//! Maps the runtime's host-builder surface onto a trait pair: a
//! [`ClusterBuilder`] assembles configuration and allocates the cluster, a
//! [`ClusterHandle`] starts and stops it. Configuration flows through
//! [`ConfigureCluster`] implementations handed to the builder; the builder
//! applies them in registration order when `build` runs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ClusterError, LoggingRegistry, ServiceRegistry};

/// A unit of cluster configuration with a single entry point.
///
/// Both the harness's composed configurator and fluent helpers implement
/// this; the builder invokes `configure` once per registered configurator
/// during `build`.
pub trait ConfigureCluster: Send + Sync {
    /// Apply this configuration to the builder.
    fn configure(&self, builder: &mut dyn ClusterBuilder) -> Result<(), ClusterError>;
}

/// Builder surface for allocating an in-memory test cluster.
#[async_trait]
pub trait ClusterBuilder: Send {
    /// Queue a configurator to be applied during `build`.
    fn add_configurator(&mut self, configurator: Arc<dyn ConfigureCluster>);

    /// Register a named in-memory actor-storage provider.
    fn add_memory_storage(&mut self, name: &str);

    /// Register a named in-memory event-stream provider.
    fn add_memory_streams(&mut self, name: &str);

    /// The service registry configurators register singletons into.
    fn services(&mut self) -> &mut ServiceRegistry;

    /// The log pipeline registry configurators register layers into.
    fn logging(&mut self) -> &mut LoggingRegistry;

    /// Apply queued configurators and allocate the cluster.
    ///
    /// The cluster is allocated but not yet started; call
    /// [`ClusterHandle::deploy`] on the returned handle.
    async fn build(self: Box<Self>) -> Result<Box<dyn ClusterHandle>, ClusterError>;
}

/// A built cluster instance.
///
/// Dropping the handle disposes the cluster's resources; implementations
/// release anything `stop_all` left behind in `Drop`.
#[async_trait]
pub trait ClusterHandle: Send + Sync {
    /// Start all cluster nodes.
    async fn deploy(&self) -> Result<(), ClusterError>;

    /// Stop all cluster nodes.
    async fn stop_all(&self) -> Result<(), ClusterError>;

    /// Resolve services from the running cluster.
    fn services(&self) -> &ServiceRegistry;
}
