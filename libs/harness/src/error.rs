//! Error types for the harness.

use thiserror::Error;

use silotest_api::ClusterError;

/// Errors surfaced while setting up or tearing down the shared cluster.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The settings source could not be loaded.
    #[error("failed to load test settings: {0}")]
    Settings(#[source] anyhow::Error),

    /// The external cluster runtime reported a failure.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}
