//! # silotest-harness
//!
//! Test support for applications built on a distributed virtual-actor
//! runtime. The runtime does the real work (cluster formation, actor
//! placement, persistence); this crate supplies the scaffolding tests need
//! around it:
//!
//! - [`fixture`] — once-per-group setup and teardown of a shared in-memory
//!   cluster, composing configuration, services, and logging into the
//!   external builder
//! - [`poll`] — retry-until-timeout waits for eventually-consistent actor
//!   state
//! - [`logging`] / [`output`] — a `tracing` layer that forwards cluster log
//!   lines to whichever test is currently executing
//! - [`memory`] — fluent registration of in-memory storage and stream
//!   providers
//! - [`settings`] — the optional `testsettings.json` severity configuration
//!
//! A test group implements [`ClusterFixture`], calls
//! [`ClusterHarness::set_up`] before its tests, and attaches its output sink
//! per test:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use silotest_harness::*;
//! # async fn example(harness: &ClusterHarness) {
//! let _output = harness.output().attach(Arc::new(PrintlnOutput));
//! wait_until(
//!     || async { /* query actor state */ true },
//!     WaitOptions::new().message("actor never converged"),
//! )
//! .await;
//! # }
//! ```
//!
//! Test execution is assumed to be serialized: one test at a time, one live
//! harness per process.

mod error;

pub mod fixture;
pub mod logging;
pub mod memory;
pub mod output;
pub mod poll;
pub mod settings;
pub mod severity;

pub use error::HarnessError;
pub use fixture::{
    ClusterFixture, ClusterHarness, ComposedConfigurator, HarnessState, SetupCallback,
};
pub use logging::TestOutputLayer;
pub use memory::MemoryClusterConfigurator;
pub use output::{BufferOutput, OutputGuard, OutputRouter, PrintlnOutput, TestOutput};
pub use poll::{wait_for, wait_until, WaitOptions};
pub use settings::TestSettings;
pub use severity::Severity;

/// Re-export of the consumed cluster-runtime surface.
pub use silotest_api as api;
