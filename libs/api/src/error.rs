//! Error types for cluster operations.

use thiserror::Error;

/// Errors surfaced by the external cluster runtime.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The builder could not assemble a cluster from the given configuration.
    #[error("cluster build failed: {0}")]
    Build(String),

    /// The cluster was built but failed to start.
    #[error("cluster deploy failed: {0}")]
    Deploy(String),

    /// One or more cluster nodes failed to stop cleanly.
    #[error("cluster stop failed: {0}")]
    Stop(String),

    /// A configurator rejected the configuration it was given.
    #[error("invalid cluster configuration: {0}")]
    InvalidConfiguration(String),

    /// Internal runtime error.
    #[error("internal cluster error: {0}")]
    Internal(#[from] anyhow::Error),
}
