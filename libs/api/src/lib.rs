//! # silotest-api
//!
//! The capability surface the silotest harness consumes from a virtual-actor
//! cluster runtime. The runtime itself is an external dependency; this crate
//! defines only the seams the harness drives:
//!
//! - [`ClusterBuilder`] / [`ClusterHandle`] — allocate, start, and stop an
//!   in-memory cluster
//! - [`ConfigureCluster`] — the single-entry-point configurator capability
//! - [`ServiceRegistry`] — singleton service registration and typed lookup
//! - [`LoggingRegistry`] — log pipeline registration for cluster-side logging
//!
//! Runtime bindings implement these traits against the real cluster host;
//! tests implement them with in-memory fakes. Harness code is written against
//! the traits alone and never names a concrete runtime.

mod cluster;
mod error;
mod logging;
mod services;

pub use cluster::{ClusterBuilder, ClusterHandle, ConfigureCluster};
pub use error::ClusterError;
pub use logging::LoggingRegistry;
pub use services::ServiceRegistry;
