//! # Graphics Backend Availability
//!
//! One ordered table describes every graphics backend the probe knows about:
//! the extension that advertises it, the key it is reported under, and the
//! shape of its requirements. Resolution walks the table once against the
//! discovered extension set; collection walks it again for the backends that
//! resolved. Adding a backend is a new table row plus its requirements call
//! in the runtime implementation.

use crate::runtime::ExtensionProperties;
use bitflags::bitflags;
use std::collections::HashSet;
use std::fmt;

/// Graphics backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Vulkan through `XR_KHR_vulkan_enable`
    Vulkan,
    /// Vulkan through `XR_KHR_vulkan_enable2`
    Vulkan2,
    /// Direct3D 11
    D3D11,
    /// Direct3D 12
    D3D12,
    /// Desktop OpenGL
    OpenGL,
}

impl Backend {
    /// Availability flag for this backend
    pub const fn flag(self) -> BackendAvailability {
        match self {
            Self::Vulkan => BackendAvailability::VULKAN,
            Self::Vulkan2 => BackendAvailability::VULKAN2,
            Self::D3D11 => BackendAvailability::D3D11,
            Self::D3D12 => BackendAvailability::D3D12,
            Self::OpenGL => BackendAvailability::OPENGL,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vulkan => "Vulkan",
            Self::Vulkan2 => "Vulkan2",
            Self::D3D11 => "D3D11",
            Self::D3D12 => "D3D12",
            Self::OpenGL => "OpenGL",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of backends whose enabling extension was discovered
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BackendAvailability: u8 {
        /// `XR_KHR_vulkan_enable` present
        const VULKAN = 1 << 0;
        /// `XR_KHR_vulkan_enable2` present
        const VULKAN2 = 1 << 1;
        /// `XR_KHR_D3D11_enable` present
        const D3D11 = 1 << 2;
        /// `XR_KHR_D3D12_enable` present
        const D3D12 = 1 << 3;
        /// `XR_KHR_opengl_enable` present
        const OPENGL = 1 << 4;
    }
}

/// How a backend expresses its requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementShape {
    /// Minimum and maximum supported API version
    ApiVersions,
    /// Minimum feature level token
    FeatureLevel,
}

/// One row of the backend table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendDescriptor {
    /// Backend identifier
    pub backend: Backend,
    /// Extension that advertises and enables the backend
    pub extension_name: &'static str,
    /// Key under `GraphicsRequirements` in the report
    pub report_key: &'static str,
    /// Requirements shape
    pub shape: RequirementShape,
    /// Whether reported versions carry a patch component
    pub reports_patch: bool,
    /// Whether this build can talk to the backend at all
    pub compiled_in: bool,
}

/// Every known backend, in resolution order
pub static KNOWN_BACKENDS: [BackendDescriptor; 5] = [
    BackendDescriptor {
        backend: Backend::Vulkan,
        extension_name: "XR_KHR_vulkan_enable",
        report_key: "Vulkan",
        shape: RequirementShape::ApiVersions,
        reports_patch: false,
        compiled_in: true,
    },
    BackendDescriptor {
        backend: Backend::Vulkan2,
        extension_name: "XR_KHR_vulkan_enable2",
        report_key: "Vulkan2",
        shape: RequirementShape::ApiVersions,
        reports_patch: false,
        compiled_in: true,
    },
    BackendDescriptor {
        backend: Backend::D3D11,
        extension_name: "XR_KHR_D3D11_enable",
        report_key: "D3D11",
        shape: RequirementShape::FeatureLevel,
        reports_patch: false,
        compiled_in: cfg!(windows),
    },
    BackendDescriptor {
        backend: Backend::D3D12,
        extension_name: "XR_KHR_D3D12_enable",
        report_key: "D3D12",
        shape: RequirementShape::FeatureLevel,
        reports_patch: false,
        compiled_in: cfg!(windows),
    },
    BackendDescriptor {
        backend: Backend::OpenGL,
        extension_name: "XR_KHR_opengl_enable",
        report_key: "OpenGL",
        shape: RequirementShape::ApiVersions,
        reports_patch: false,
        compiled_in: true,
    },
];

/// Backends this build can check, in resolution order
pub fn platform_backends() -> Vec<BackendDescriptor> {
    KNOWN_BACKENDS
        .iter()
        .filter(|descriptor| descriptor.compiled_in)
        .copied()
        .collect()
}

/// Look up the table row for a backend
pub fn descriptor(backend: Backend) -> &'static BackendDescriptor {
    match backend {
        Backend::Vulkan => &KNOWN_BACKENDS[0],
        Backend::Vulkan2 => &KNOWN_BACKENDS[1],
        Backend::D3D11 => &KNOWN_BACKENDS[2],
        Backend::D3D12 => &KNOWN_BACKENDS[3],
        Backend::OpenGL => &KNOWN_BACKENDS[4],
    }
}

/// Outcome of matching the backend table against the extension set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackendResolution {
    /// Backends whose extension was found
    pub availability: BackendAvailability,
    /// Extensions to enable at instance creation, in table order
    pub enabled_extensions: Vec<&'static str>,
}

impl BackendResolution {
    /// Whether a backend resolved
    pub fn is_available(&self, backend: Backend) -> bool {
        self.availability.contains(backend.flag())
    }
}

/// Match `table` against the discovered extensions
///
/// Names are compared exactly and case-sensitively.
pub fn resolve(extensions: &[ExtensionProperties], table: &[BackendDescriptor]) -> BackendResolution {
    let present: HashSet<&str> = extensions.iter().map(|ext| ext.name.as_str()).collect();

    let mut resolution = BackendResolution::default();
    for descriptor in table {
        if present.contains(descriptor.extension_name) {
            resolution.availability |= descriptor.backend.flag();
            resolution.enabled_extensions.push(descriptor.extension_name);
        }
    }
    resolution
}
