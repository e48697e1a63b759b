//! Log severity levels and their configuration spelling.
//!
//! Severities order from least to most severe; `None` sits above everything
//! and disables a category outright. The five `tracing` levels map onto the
//! lower five severities; `Critical` and `None` exist only as configuration
//! values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Minimum-severity levels understood by the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl Severity {
    /// Fixed 4-character token used in rendered log lines.
    pub const fn code(self) -> &'static str {
        match self {
            Severity::Trace => "TRCE",
            Severity::Debug => "DBUG",
            Severity::Information => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERRR",
            Severity::Critical => "CRIT",
            Severity::None => "NONE",
        }
    }

    /// Map a `tracing` level onto its severity.
    pub fn from_level(level: &tracing::Level) -> Self {
        if *level == tracing::Level::TRACE {
            Severity::Trace
        } else if *level == tracing::Level::DEBUG {
            Severity::Debug
        } else if *level == tracing::Level::INFO {
            Severity::Information
        } else if *level == tracing::Level::WARN {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
            Severity::None => "None",
        };
        write!(f, "{name}")
    }
}

/// A severity string in the settings file was not recognized.
#[derive(Debug, Error)]
#[error("unknown severity: {0:?}")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "information" | "info" => Ok(Severity::Information),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            "none" => Ok(Severity::None),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
