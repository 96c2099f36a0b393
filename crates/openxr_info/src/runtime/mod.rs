//! # Runtime Collaborator
//!
//! The seam between discovery and the capability-providing OpenXR runtime.
//! Discovery only consumes [`XrRuntime`] and [`XrInstance`]; the production
//! implementation lives in [`loader`] and a scripted one in `mock` for tests.
//!
//! Raw result codes are decoded into [`RuntimeError`] once, inside the
//! implementations, and never re-inspected as codes downstream.

pub mod enumerate;
pub mod loader;

#[cfg(test)]
pub(crate) mod mock;

use crate::backend::Backend;
use std::fmt;
use thiserror::Error;

/// Runtime collaborator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// No OpenXR loader could be located or loaded
    #[error("OpenXR loader unavailable: {0}")]
    LoaderUnavailable(String),

    /// The form factor is recognized but no device is currently present
    #[error("Form factor currently unavailable")]
    FormFactorUnavailable,

    /// The runtime never supports the form factor
    #[error("Form factor unsupported by this runtime")]
    FormFactorUnsupported,

    /// The runtime kept changing the item count between enumeration calls
    #[error("Enumeration did not settle after {attempts} attempts")]
    EnumerationUnstable {
        /// Number of count/fill rounds attempted
        attempts: usize,
    },

    /// A string could not be passed to the runtime
    #[error("Invalid string for runtime call: {0}")]
    InvalidString(String),

    /// Backend requirements were requested for an extension that is not enabled
    #[error("Backend {0} not enabled on this instance")]
    BackendNotEnabled(Backend),

    /// Any other OpenXR result code
    #[error("OpenXR API error: {code}")]
    Api {
        /// Raw `XrResult` value
        code: i32,
    },
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Installed API layer as reported by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerProperties {
    /// Layer name, the key used for layer-scoped extension queries
    pub name: String,
    /// Layer implementation version
    pub version: u32,
    /// Human-readable description
    pub description: String,
}

/// Extension as reported by the runtime or a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionProperties {
    /// Extension name, e.g. `XR_KHR_vulkan_enable`
    pub name: String,
    /// Extension revision
    pub version: u32,
}

/// Application identity passed to instance creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationInfo<'a> {
    /// Application name
    pub application_name: &'a str,
    /// Application version
    pub application_version: u32,
    /// Engine name
    pub engine_name: &'a str,
    /// Engine version
    pub engine_version: u32,
}

/// Device category a system can be requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormFactor {
    /// Phone or tablet style display
    Handheld,
    /// Head-mounted display
    HeadMounted,
}

impl FormFactor {
    /// Probe order, which is also the console and report order
    pub const ALL: [Self; 2] = [Self::Handheld, Self::HeadMounted];

    /// Short label for console messages
    pub const fn label(self) -> &'static str {
        match self {
            Self::Handheld => "handheld",
            Self::HeadMounted => "HMD",
        }
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque system handle resolved for a form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub u64);

impl SystemId {
    /// The runtime's null system id
    pub const NULL: Self = Self(0);

    /// Whether this id refers to a real system
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Tracking capabilities of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingProperties {
    /// Orientation tracking supported
    pub orientation_tracking: bool,
    /// Position tracking supported
    pub position_tracking: bool,
}

/// Compositor limits of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsProperties {
    /// Maximum number of composition layers
    pub max_layer_count: u32,
    /// Maximum swapchain image width
    pub max_swapchain_image_width: u32,
    /// Maximum swapchain image height
    pub max_swapchain_image_height: u32,
}

/// Static properties of a resolved system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemProperties {
    /// System name
    pub system_name: String,
    /// Vendor id
    pub vendor_id: u32,
    /// Tracking capabilities
    pub tracking: TrackingProperties,
    /// Compositor limits
    pub graphics: GraphicsProperties,
}

/// Packed OpenXR-style version, split into its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Patch version
    pub patch: u32,
}

impl ApiVersion {
    /// Create a version from its components
    pub const fn new(major: u16, minor: u16, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Graphics requirements exactly as the runtime returned them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsRequirements {
    /// Supported API version range (OpenGL, Vulkan)
    ApiVersions {
        /// Minimum supported API version
        min: ApiVersion,
        /// Maximum supported API version
        max: ApiVersion,
    },
    /// Minimum raw `D3D_FEATURE_LEVEL` value (Direct3D)
    FeatureLevel(u32),
}

/// Entry points of a capability-providing runtime
pub trait XrRuntime {
    /// Enumerate installed API layers
    fn enumerate_layers(&self) -> RuntimeResult<Vec<LayerProperties>>;

    /// Enumerate extensions, either of the runtime itself (`None`) or of one layer
    fn enumerate_extensions(&self, layer: Option<&str>) -> RuntimeResult<Vec<ExtensionProperties>>;

    /// Create an instance with the given extensions enabled
    ///
    /// The returned box owns the instance; dropping it destroys the instance.
    fn create_instance(
        &self,
        app: &ApplicationInfo<'_>,
        enabled_extensions: &[&str],
    ) -> RuntimeResult<Box<dyn XrInstance>>;
}

/// Queries available on a live runtime instance
pub trait XrInstance {
    /// Resolve the system for a form factor
    fn system(&self, form_factor: FormFactor) -> RuntimeResult<SystemId>;

    /// Query static properties of a system
    fn system_properties(&self, system: SystemId) -> RuntimeResult<SystemProperties>;

    /// Query one backend's graphics requirements for a system
    fn graphics_requirements(
        &self,
        system: SystemId,
        backend: Backend,
    ) -> RuntimeResult<GraphicsRequirements>;
}
