//! # Report Document
//!
//! The serialized shape of a discovery pass:
//!
//! ```json
//! { "OpenXR": { "version": "1.0.0", "layer_list": [], "extension_list": [],
//!               "XrSystem": { "handheldSystem": {}, "hmdSystem": {} } } }
//! ```
//!
//! Optional subtrees are skipped when absent rather than written as `null`;
//! a missing key means the value could not be determined.

use crate::runtime::FormFactor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Report output errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Serialization failed
    #[error("Cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the report file failed
    #[error("Cannot write report to {path}: {source}")]
    Io {
        /// Destination path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Top-level document wrapping the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// The report itself
    #[serde(rename = "OpenXR")]
    pub openxr: Report,
}

/// Discovered capability tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version
    pub version: String,
    /// Installed API layers
    pub layer_list: Vec<LayerRecord>,
    /// All extensions, layer-provided ones included
    pub extension_list: Vec<ExtensionRecord>,
    /// Systems resolved per form factor
    #[serde(rename = "XrSystem", default, skip_serializing_if = "Option::is_none")]
    pub xr_system: Option<XrSystemReport>,
}

/// Layer entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    /// Layer name
    pub name: String,
    /// Layer implementation version
    pub version: u32,
    /// Layer description
    pub description: String,
}

/// Extension entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    /// Extension name
    pub name: String,
    /// Extension revision
    pub version: u32,
    /// Layer that provides the extension
    #[serde(rename = "providedBy", default, skip_serializing_if = "Option::is_none")]
    pub provided_by: Option<String>,
}

/// Systems keyed by form factor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrSystemReport {
    /// Handheld display system
    #[serde(rename = "handheldSystem", default, skip_serializing_if = "Option::is_none")]
    pub handheld: Option<SystemReport>,
    /// Head-mounted display system
    #[serde(rename = "hmdSystem", default, skip_serializing_if = "Option::is_none")]
    pub hmd: Option<SystemReport>,
}

impl XrSystemReport {
    /// Slot for a form factor
    pub fn slot_mut(&mut self, form_factor: FormFactor) -> &mut Option<SystemReport> {
        match form_factor {
            FormFactor::Handheld => &mut self.handheld,
            FormFactor::HeadMounted => &mut self.hmd,
        }
    }

    /// Report for a form factor
    pub const fn get(&self, form_factor: FormFactor) -> Option<&SystemReport> {
        match form_factor {
            FormFactor::Handheld => self.handheld.as_ref(),
            FormFactor::HeadMounted => self.hmd.as_ref(),
        }
    }

    /// Whether no system was recorded
    pub const fn is_empty(&self) -> bool {
        self.handheld.is_none() && self.hmd.is_none()
    }
}

/// Static properties and graphics requirements of one system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemReport {
    /// System name
    pub system_name: String,
    /// Vendor id
    pub vendor_id: u32,
    /// Tracking capabilities
    pub tracking_properties: TrackingReport,
    /// Compositor limits
    pub graphics_properties: GraphicsPropertiesReport,
    /// Requirements per backend report key
    #[serde(
        rename = "GraphicsRequirements",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub graphics_requirements: BTreeMap<String, GraphicsRequirement>,
}

/// Tracking capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingReport {
    /// Orientation tracking supported
    pub orientation_tracking: bool,
    /// Position tracking supported
    pub position_tracking: bool,
}

/// Compositor limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsPropertiesReport {
    /// Maximum composition layers
    pub max_layer_count: u32,
    /// Maximum swapchain image width
    pub max_swapchain_image_width: u32,
    /// Maximum swapchain image height
    pub max_swapchain_image_height: u32,
}

/// Requirements of one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphicsRequirement {
    /// Supported API version range
    #[serde(rename_all = "camelCase")]
    Versions {
        /// Minimum supported API version
        min_api_version_supported: VersionReport,
        /// Maximum supported API version
        max_api_version_supported: VersionReport,
    },
    /// Minimum feature level, empty when the level is not recognized
    #[serde(rename_all = "camelCase")]
    FeatureLevel {
        /// Symbolic feature level name
        min_feature_level: String,
    },
}

/// Version object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReport {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Patch version, for backends whose scheme defines one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<u32>,
}

impl Report {
    /// Empty report for the given schema version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            layer_list: Vec::new(),
            extension_list: Vec::new(),
            xr_system: None,
        }
    }

    /// Record a system under its form factor
    pub fn insert_system(&mut self, form_factor: FormFactor, system: SystemReport) {
        *self
            .xr_system
            .get_or_insert_with(XrSystemReport::default)
            .slot_mut(form_factor) = Some(system);
    }

    /// Report recorded for a form factor
    pub fn system(&self, form_factor: FormFactor) -> Option<&SystemReport> {
        self.xr_system.as_ref().and_then(|systems| systems.get(form_factor))
    }
}

impl ReportDocument {
    /// Wrap a report
    pub const fn new(openxr: Report) -> Self {
        Self { openxr }
    }

    /// Serialize with two-space indentation
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a serialized document
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize and write to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
