//! Optional per-run settings file.
//!
//! `testsettings.json` is looked up in the test binary's working directory at
//! cluster setup time. A missing file is not an error; every section is
//! optional. Key casing mirrors the settings format of the actor runtime's
//! host configuration, so a file can be shared between the application and
//! its tests:
//!
//! ```json
//! {
//!   "Logging": {
//!     "LogLevel": { "Default": "Warning", "app.actors": "Debug" },
//!     "SiloTest": { "LogLevel": { "Default": "Information" } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::severity::Severity;

/// Conventional settings file name.
pub const SETTINGS_FILE: &str = "testsettings.json";

/// Root of the settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestSettings {
    /// Logging configuration.
    #[serde(rename = "Logging", default)]
    pub logging: LoggingSettings,
}

/// The `Logging` section: a generic severity map plus a tool-specific one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Generic minimum severity per category prefix.
    #[serde(rename = "LogLevel", default)]
    pub log_level: BTreeMap<String, Severity>,

    /// Harness-specific overrides; these take priority over `LogLevel`.
    #[serde(rename = "SiloTest", default)]
    pub silotest: ToolLoggingSettings,
}

/// The `Logging.SiloTest` subsection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolLoggingSettings {
    /// Minimum severity per category prefix.
    #[serde(rename = "LogLevel", default)]
    pub log_level: BTreeMap<String, Severity>,
}

impl TestSettings {
    /// Load `testsettings.json` from the working directory.
    ///
    /// Returns defaults when the file does not exist.
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load settings from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}
