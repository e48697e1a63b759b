//! Condition polling for eventually-consistent actor state.
//!
//! Tests call [`wait_for`] to repeatedly sample an asynchronous value until a
//! predicate holds or the deadline passes. Deadline expiry is a hard test
//! failure (panic), never a returned error. Producer panics propagate
//! immediately; the poller does not retry a failing producer.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Default deadline for a single wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline used in debug mode, long enough to step through a test.
pub const DEBUG_TIMEOUT: Duration = Duration::from_secs(3600);

/// Default delay between attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Environment variable that forces debug mode when set to a truthy value.
pub const DEBUG_ENV_VAR: &str = "SILOTEST_DEBUG";

/// Whether extended timeouts should apply.
///
/// True when [`DEBUG_ENV_VAR`] is set to `1`, `true`, or `yes`
/// (case-insensitive), or when a debugger is attached to the process.
pub fn debug_mode() -> bool {
    if let Ok(value) = std::env::var(DEBUG_ENV_VAR) {
        if matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ) {
            return true;
        }
    }
    debugger_attached()
}

#[cfg(target_os = "linux")]
fn debugger_attached() -> bool {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return false;
    };
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|value| value.trim().parse::<u32>().ok())
        .map(|pid| pid != 0)
        .unwrap_or(false)
}

#[cfg(not(target_os = "linux"))]
fn debugger_attached() -> bool {
    false
}

/// The deadline applied when [`WaitOptions`] does not set one.
pub fn default_timeout() -> Duration {
    if debug_mode() {
        DEBUG_TIMEOUT
    } else {
        DEFAULT_TIMEOUT
    }
}

/// Tuning knobs for [`wait_for`] and [`wait_until`].
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Total deadline for the wait.
    pub timeout: Duration,

    /// Delay between attempts.
    pub interval: Duration,

    /// Message prefix included in the failure panic.
    pub message: Option<String>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            interval: DEFAULT_INTERVAL,
            message: None,
        }
    }
}

impl WaitOptions {
    /// Defaults: [`default_timeout`] and [`DEFAULT_INTERVAL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the delay between attempts.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the failure message prefix.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Poll `producer` until `predicate` accepts its result or the deadline
/// passes; returns the accepted value.
///
/// The producer is invoked once per attempt and must tolerate repeated
/// calls. A zero deadline fails fast without a single attempt; a deadline at
/// or below the interval still allows one attempt. On expiry this panics with
/// the configured message, the deadline, and the last observed value.
pub async fn wait_for<T, F, Fut, P>(mut producer: F, predicate: P, options: WaitOptions) -> T
where
    T: fmt::Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
    P: Fn(&T) -> bool,
{
    let start = Instant::now();
    let mut last: Option<T> = None;

    while start.elapsed() < options.timeout {
        let value = producer().await;
        if predicate(&value) {
            return value;
        }
        last = Some(value);
        tokio::time::sleep(options.interval).await;
    }

    let message = options
        .message
        .as_deref()
        .unwrap_or("condition was not satisfied");
    panic!(
        "{message}: timed out after {:?} (last observed value: {last:?})",
        options.timeout
    );
}

/// Boolean sugar over [`wait_for`]: the produced value is the condition.
pub async fn wait_until<F, Fut>(probe: F, options: WaitOptions)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for(probe, |ready| *ready, options).await;
}
