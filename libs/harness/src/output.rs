//! Routing of log lines to the currently executing test.
//!
//! The router is explicit process-scoped state: the harness owns one and
//! hands clones to collaborators (no ambient static). Exactly one test is
//! expected to hold the current sink at a time; test execution is assumed to
//! be serialized. If two tests overlap, lines may be attributed to the wrong
//! test, which is cosmetic only.

use std::io;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// A destination for rendered log lines.
pub trait TestOutput: Send + Sync {
    /// Write one already-formatted line.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Shared reference to whichever test is currently executing.
#[derive(Clone, Default)]
pub struct OutputRouter {
    current: Arc<RwLock<Option<Arc<dyn TestOutput>>>>,
}

impl OutputRouter {
    /// Create a router with no current sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `sink` the current test's output until the guard drops.
    pub fn attach(&self, sink: Arc<dyn TestOutput>) -> OutputGuard {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(sink);
        OutputGuard {
            router: self.clone(),
        }
    }

    /// The current test's sink, if one is attached.
    pub fn current(&self) -> Option<Arc<dyn TestOutput>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for OutputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputRouter")
            .field("attached", &self.current().is_some())
            .finish()
    }
}

/// Clears the router's current sink when dropped.
#[must_use = "the sink detaches as soon as the guard drops"]
pub struct OutputGuard {
    router: OutputRouter,
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        self.router.clear();
    }
}

/// Routes lines through `println!`, which libtest captures per test.
pub struct PrintlnOutput;

impl TestOutput for PrintlnOutput {
    fn write_line(&self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }
}

/// Collects lines in memory for assertions.
#[derive(Default)]
pub struct BufferOutput {
    lines: Mutex<Vec<String>>,
}

impl BufferOutput {
    /// Create an empty shared buffer.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the collected lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether any collected line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl TestOutput for BufferOutput {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}
