//! # Probe Configuration
//!
//! Fixed parameters of a discovery pass: the application identity handed to
//! the runtime at instance creation, the report schema version, and where the
//! report lands. The tool always runs with [`ProbeConfig::default`]; the
//! builder methods exist for embedding and tests.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default report file, relative to the current working directory
pub const DEFAULT_OUTPUT_FILE: &str = "report.json";

/// Schema version written at the top of every report
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field was left empty
    #[error("Invalid configuration: {field} cannot be empty")]
    EmptyField {
        /// Name of the offending field
        field: &'static str,
    },

    /// A string cannot be passed across the runtime boundary
    #[error("Invalid configuration: {field} contains an interior nul byte")]
    InteriorNul {
        /// Name of the offending field
        field: &'static str,
    },
}

/// # Probe Configuration
///
/// Application metadata for instance creation plus report output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Application name reported to the runtime
    pub application_name: String,
    /// Application version reported to the runtime
    pub application_version: u32,
    /// Engine name reported to the runtime
    pub engine_name: String,
    /// Engine version reported to the runtime
    pub engine_version: u32,
    /// Schema version stored in the report's `version` field
    pub report_version: String,
    /// Report destination
    pub output_path: PathBuf,
}

impl ProbeConfig {
    /// Create a configuration for the given application name
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            application_version: 1,
            engine_name: "openxr_info".to_string(),
            engine_version: 1,
            report_version: REPORT_SCHEMA_VERSION.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }

    /// Set the application identity
    #[must_use]
    pub fn with_application(mut self, name: impl Into<String>, version: u32) -> Self {
        self.application_name = name.into();
        self.application_version = version;
        self
    }

    /// Set where the report is written
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::EmptyField { field: "application_name" });
        }
        if self.application_name.contains('\0') {
            return Err(ConfigError::InteriorNul { field: "application_name" });
        }
        if self.engine_name.contains('\0') {
            return Err(ConfigError::InteriorNul { field: "engine_name" });
        }
        if self.report_version.is_empty() {
            return Err(ConfigError::EmptyField { field: "report_version" });
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyField { field: "output_path" });
        }
        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new("OpenXR-info")
    }
}
