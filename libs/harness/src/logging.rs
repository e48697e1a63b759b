//! Log layer that forwards cluster log records to the current test's output.
//!
//! The layer plugs into the cluster's `tracing` pipeline and renders each
//! accepted record as `[HH:mm:ss.fff] [CODE] [category] message`. Records are
//! gated by a per-category minimum severity built once from the settings
//! file; the resolved minimum for a category is fixed for the layer's
//! lifetime. Span scopes carry no data here and are ignored.
//!
//! Writing a line must never fail the system under test: sink errors are
//! swallowed.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::output::{OutputRouter, TestOutput};
use crate::settings::LoggingSettings;
use crate::severity::Severity;

/// Minimum severity applied when no settings entry matches a category.
pub const FALLBACK_SEVERITY: Severity = Severity::Information;

/// Settings key that applies to categories with no more specific entry.
const DEFAULT_KEY: &str = "Default";

/// Categories longer than this are shortened in rendered lines.
const MAX_CATEGORY_LEN: usize = 40;

/// Severity configuration built once from the settings sections.
///
/// Harness-specific entries take priority; generic entries fill the gaps.
/// Neither overwrites a key that is already present.
pub struct SeverityMap {
    entries: HashMap<String, Severity>,
}

impl SeverityMap {
    /// Merge the tool-specific and generic severity sections.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let mut entries = HashMap::new();
        for (key, severity) in &settings.silotest.log_level {
            entries.entry(key.clone()).or_insert(*severity);
        }
        for (key, severity) in &settings.log_level {
            entries.entry(key.clone()).or_insert(*severity);
        }
        Self { entries }
    }

    /// A map with no configured entries; everything resolves to the fallback.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Resolve the minimum severity for a category.
    ///
    /// Exact key match wins, then the longest matching prefix, then the
    /// `"Default"` key, then [`FALLBACK_SEVERITY`].
    pub fn resolve(&self, category: &str) -> Severity {
        if let Some(severity) = self.entries.get(category) {
            return *severity;
        }

        let mut best: Option<(&str, Severity)> = None;
        for (key, severity) in &self.entries {
            if key != DEFAULT_KEY && category.starts_with(key.as_str()) {
                let longer = best.map_or(true, |(current, _)| key.len() > current.len());
                if longer {
                    best = Some((key, *severity));
                }
            }
        }
        if let Some((_, severity)) = best {
            return severity;
        }

        self.entries
            .get(DEFAULT_KEY)
            .copied()
            .unwrap_or(FALLBACK_SEVERITY)
    }
}

/// `tracing` layer that writes accepted records to the current test's sink.
pub struct TestOutputLayer {
    severities: SeverityMap,
    // Per-category minimum, resolved on first use and fixed thereafter.
    resolved: Mutex<HashMap<String, Severity>>,
    router: OutputRouter,
    fallback_sink: Option<Arc<dyn TestOutput>>,
}

impl TestOutputLayer {
    /// Build a layer from the settings' logging section.
    ///
    /// The router's current sink, if any, is captured as the fallback used
    /// when no test is executing.
    pub fn new(settings: Option<&LoggingSettings>, router: OutputRouter) -> Self {
        let fallback_sink = router.current();
        Self {
            severities: settings
                .map(SeverityMap::from_settings)
                .unwrap_or_else(SeverityMap::empty),
            resolved: Mutex::new(HashMap::new()),
            router,
            fallback_sink,
        }
    }

    /// Replace the fallback sink captured at construction.
    pub fn with_fallback_sink(mut self, sink: Arc<dyn TestOutput>) -> Self {
        self.fallback_sink = Some(sink);
        self
    }

    fn min_severity(&self, category: &str) -> Severity {
        let mut resolved = self
            .resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *resolved
            .entry(category.to_string())
            .or_insert_with(|| self.severities.resolve(category))
    }

    fn sink(&self) -> Option<Arc<dyn TestOutput>> {
        self.router.current().or_else(|| self.fallback_sink.clone())
    }
}

impl<S: Subscriber> Layer<S> for TestOutputLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(sink) = self.sink() else {
            return;
        };

        let severity = Severity::from_level(event.metadata().level());
        let category = event.metadata().target();
        if severity < self.min_severity(category) {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        // Sink errors are deliberately discarded.
        let _ = sink.write_line(&format_line(severity, category, &visitor));
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
    error: Option<String>,
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.error = Some(format!("{}: {value}", field.name()));
    }
}

fn format_line(severity: Severity, category: &str, visitor: &LineVisitor) -> String {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let mut line = format!(
        "[{timestamp}] [{}] [{}] {}",
        severity.code(),
        shorten_category(category),
        visitor.message
    );
    for (name, value) in &visitor.fields {
        let _ = write!(line, " {name}={value}");
    }
    if let Some(error) = &visitor.error {
        let _ = write!(line, "\n{error}");
    }
    line
}

/// Shorten long categories to their last two dot-separated segments, or the
/// trailing [`MAX_CATEGORY_LEN`] characters when there is nothing to split.
fn shorten_category(category: &str) -> Cow<'_, str> {
    if category.len() <= MAX_CATEGORY_LEN {
        return Cow::Borrowed(category);
    }

    let mut segments = category.rsplit('.');
    let last = segments.next().unwrap_or(category);
    if let Some(second_last) = segments.next() {
        return Cow::Owned(format!("...{second_last}.{last}"));
    }

    let tail_start = category
        .char_indices()
        .rev()
        .nth(MAX_CATEGORY_LEN - 1)
        .map(|(index, _)| index)
        .unwrap_or(0);
    Cow::Owned(format!("...{}", &category[tail_start..]))
}
