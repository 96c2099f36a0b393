//! # System Property and Graphics Requirements Collection
//!
//! For a resolved system, queries its static properties in one call and then
//! the requirements of every backend that resolved. A failed properties call
//! drops the whole system; a failed requirements call drops only that
//! backend's entry.

use crate::backend::{BackendDescriptor, BackendResolution, RequirementShape};
use crate::report::{
    GraphicsPropertiesReport, GraphicsRequirement, SystemReport, TrackingReport, VersionReport,
};
use crate::runtime::{
    ApiVersion, FormFactor, GraphicsRequirements, RuntimeResult, SystemId, SystemProperties,
    XrInstance,
};
use log::{info, warn};
use std::collections::BTreeMap;

/// `D3D_FEATURE_LEVEL` values and their symbolic names
pub const FEATURE_LEVELS: [(u32, &str); 11] = [
    (0x1000, "D3D_FEATURE_LEVEL_1_0_CORE"),
    (0x9100, "D3D_FEATURE_LEVEL_9_1"),
    (0x9200, "D3D_FEATURE_LEVEL_9_2"),
    (0x9300, "D3D_FEATURE_LEVEL_9_3"),
    (0xa000, "D3D_FEATURE_LEVEL_10_0"),
    (0xa100, "D3D_FEATURE_LEVEL_10_1"),
    (0xb000, "D3D_FEATURE_LEVEL_11_0"),
    (0xb100, "D3D_FEATURE_LEVEL_11_1"),
    (0xc000, "D3D_FEATURE_LEVEL_12_0"),
    (0xc100, "D3D_FEATURE_LEVEL_12_1"),
    (0xc200, "D3D_FEATURE_LEVEL_12_2"),
];

/// Symbolic name of a feature level, empty when unrecognized
pub fn feature_level_name(level: u32) -> &'static str {
    FEATURE_LEVELS
        .iter()
        .find(|(value, _)| *value == level)
        .map_or("", |(_, name)| *name)
}

fn version_report(version: ApiVersion, reports_patch: bool) -> VersionReport {
    VersionReport {
        major: version.major,
        minor: version.minor,
        patch: reports_patch.then_some(version.patch),
    }
}

/// Shape runtime requirements for the report
///
/// Returns `None` when the runtime answered with a shape the backend does
/// not use.
pub fn requirement_report(
    descriptor: &BackendDescriptor,
    requirements: GraphicsRequirements,
) -> Option<GraphicsRequirement> {
    match (descriptor.shape, requirements) {
        (RequirementShape::ApiVersions, GraphicsRequirements::ApiVersions { min, max }) => {
            Some(GraphicsRequirement::Versions {
                min_api_version_supported: version_report(min, descriptor.reports_patch),
                max_api_version_supported: version_report(max, descriptor.reports_patch),
            })
        }
        (RequirementShape::FeatureLevel, GraphicsRequirements::FeatureLevel(level)) => {
            Some(GraphicsRequirement::FeatureLevel {
                min_feature_level: feature_level_name(level).to_string(),
            })
        }
        _ => None,
    }
}

fn system_report(properties: &SystemProperties) -> SystemReport {
    SystemReport {
        system_name: properties.system_name.clone(),
        vendor_id: properties.vendor_id,
        tracking_properties: TrackingReport {
            orientation_tracking: properties.tracking.orientation_tracking,
            position_tracking: properties.tracking.position_tracking,
        },
        graphics_properties: GraphicsPropertiesReport {
            max_layer_count: properties.graphics.max_layer_count,
            max_swapchain_image_width: properties.graphics.max_swapchain_image_width,
            max_swapchain_image_height: properties.graphics.max_swapchain_image_height,
        },
        graphics_requirements: BTreeMap::new(),
    }
}

/// Collects reports for resolved systems
pub struct SystemCollector<'a> {
    instance: &'a dyn XrInstance,
    backends: &'a [BackendDescriptor],
    resolution: &'a BackendResolution,
}

impl<'a> SystemCollector<'a> {
    /// Collector over `backends`, querying only those present in `resolution`
    pub const fn new(
        instance: &'a dyn XrInstance,
        backends: &'a [BackendDescriptor],
        resolution: &'a BackendResolution,
    ) -> Self {
        Self {
            instance,
            backends,
            resolution,
        }
    }

    /// Build the report for one system, or `None` if its properties are unavailable
    pub fn collect(&self, form_factor: FormFactor, system: SystemId) -> Option<SystemReport> {
        let properties = match self.instance.system_properties(system) {
            Ok(properties) => properties,
            Err(e) => {
                warn!("Cannot query {form_factor} system properties: {e}");
                return None;
            }
        };

        info!("system name {}", properties.system_name);
        info!("vendor id {}", properties.vendor_id);
        info!(
            "support orientation tracking {}",
            properties.tracking.orientation_tracking
        );
        info!("support position tracking {}", properties.tracking.position_tracking);

        let mut report = system_report(&properties);
        for descriptor in self.enabled_backends() {
            match self.query_requirements(descriptor, system) {
                Ok(Some(requirement)) => {
                    report
                        .graphics_requirements
                        .insert(descriptor.report_key.to_string(), requirement);
                }
                Ok(None) => warn!(
                    "{} requirements for {form_factor} system came back in an unexpected shape",
                    descriptor.backend
                ),
                Err(e) => warn!(
                    "Cannot query {} requirements for {form_factor} system: {e}",
                    descriptor.backend
                ),
            }
        }
        Some(report)
    }

    fn enabled_backends(&self) -> impl Iterator<Item = &'a BackendDescriptor> + '_ {
        self.backends
            .iter()
            .filter(|descriptor| self.resolution.is_available(descriptor.backend))
    }

    fn query_requirements(
        &self,
        descriptor: &BackendDescriptor,
        system: SystemId,
    ) -> RuntimeResult<Option<GraphicsRequirement>> {
        let requirements = self.instance.graphics_requirements(system, descriptor.backend)?;
        Ok(requirement_report(descriptor, requirements))
    }
}
