//! OpenXR loader backed runtime
//!
//! Loads the system OpenXR loader through the `openxr` crate. Layer and
//! extension enumeration go through the raw entry points, since the safe
//! wrapper cannot scope an extension query to one layer. Everything from
//! instance creation on uses the safe wrapper.

use super::enumerate::{check, two_call};
use super::{
    ApiVersion, ApplicationInfo, ExtensionProperties, FormFactor, GraphicsProperties,
    GraphicsRequirements, LayerProperties, RuntimeError, RuntimeResult, SystemId,
    SystemProperties, TrackingProperties, XrInstance, XrRuntime,
};
use crate::backend::{Backend, BackendAvailability, KNOWN_BACKENDS};
use openxr as xr;
use openxr::sys;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Runtime reached through the installed OpenXR loader
pub struct OpenXrRuntime {
    entry: xr::Entry,
}

impl OpenXrRuntime {
    /// Locate and load the OpenXR loader
    pub fn load() -> RuntimeResult<Self> {
        // SAFETY: the loader library is a well-known system component and is
        // only used through the entry points the `openxr` crate resolves.
        let entry = unsafe { xr::Entry::load() }
            .map_err(|e| RuntimeError::LoaderUnavailable(format!("{e:?}")))?;
        Ok(Self { entry })
    }
}

fn fixed_string(chars: &[c_char]) -> String {
    #[allow(clippy::cast_sign_loss)]
    let bytes: Vec<u8> = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn capacity<T>(buffer: &[T]) -> u32 {
    u32::try_from(buffer.len()).unwrap_or(u32::MAX)
}

fn buffer_ptr<T>(buffer: &mut [T]) -> *mut T {
    if buffer.is_empty() {
        ptr::null_mut()
    } else {
        buffer.as_mut_ptr()
    }
}

fn blank_layer() -> sys::ApiLayerProperties {
    // SAFETY: plain C struct; zero is valid for every field.
    let mut properties: sys::ApiLayerProperties = unsafe { std::mem::zeroed() };
    properties.ty = sys::StructureType::API_LAYER_PROPERTIES;
    properties
}

fn blank_extension() -> sys::ExtensionProperties {
    // SAFETY: plain C struct; zero is valid for every field.
    let mut properties: sys::ExtensionProperties = unsafe { std::mem::zeroed() };
    properties.ty = sys::StructureType::EXTENSION_PROPERTIES;
    properties
}

impl XrRuntime for OpenXrRuntime {
    fn enumerate_layers(&self) -> RuntimeResult<Vec<LayerProperties>> {
        let fp = self.entry.fp();
        let raw = two_call(blank_layer(), |buffer, count| {
            // SAFETY: `buffer` holds exactly `capacity(buffer)` initialized elements
            // and `count` is a valid out pointer.
            unsafe { (fp.enumerate_api_layer_properties)(capacity(buffer), count, buffer_ptr(buffer)) }
        })?;

        Ok(raw
            .iter()
            .map(|layer| LayerProperties {
                name: fixed_string(&layer.layer_name),
                version: layer.layer_version,
                description: fixed_string(&layer.description),
            })
            .collect())
    }

    fn enumerate_extensions(&self, layer: Option<&str>) -> RuntimeResult<Vec<ExtensionProperties>> {
        let layer_name = layer
            .map(|name| CString::new(name).map_err(|_| RuntimeError::InvalidString(name.to_string())))
            .transpose()?;
        let layer_ptr = layer_name.as_ref().map_or(ptr::null(), |name| name.as_ptr());

        let fp = self.entry.fp();
        let raw = two_call(blank_extension(), |buffer, count| {
            // SAFETY: `layer_ptr` is null or a nul-terminated string that outlives
            // the call; buffer and count as above.
            unsafe {
                (fp.enumerate_instance_extension_properties)(
                    layer_ptr,
                    capacity(buffer),
                    count,
                    buffer_ptr(buffer),
                )
            }
        })?;

        Ok(raw
            .iter()
            .map(|extension| ExtensionProperties {
                name: fixed_string(&extension.extension_name),
                version: extension.extension_version,
            })
            .collect())
    }

    fn create_instance(
        &self,
        app: &ApplicationInfo<'_>,
        enabled_extensions: &[&str],
    ) -> RuntimeResult<Box<dyn XrInstance>> {
        let mut extensions = xr::ExtensionSet::default();
        let mut enabled = BackendAvailability::empty();
        for &name in enabled_extensions {
            match KNOWN_BACKENDS.iter().find(|d| d.extension_name == name) {
                Some(descriptor) if enable_backend(&mut extensions, descriptor.backend) => {
                    enabled |= descriptor.backend.flag();
                }
                _ => extensions.other.push(name.to_string()),
            }
        }

        let info = xr::ApplicationInfo {
            application_name: app.application_name,
            application_version: app.application_version,
            engine_name: app.engine_name,
            engine_version: app.engine_version,
        };
        let instance = self.entry.create_instance(&info, &extensions, &[])?;

        if let Ok(properties) = instance.properties() {
            log::info!(
                "Runtime {} version {}",
                properties.runtime_name,
                properties.runtime_version
            );
        }

        Ok(Box::new(OpenXrInstance { instance, enabled }))
    }
}

/// Set the wrapper's flag for a backend extension, if this build has one
fn enable_backend(extensions: &mut xr::ExtensionSet, backend: Backend) -> bool {
    match backend {
        Backend::Vulkan => extensions.khr_vulkan_enable = true,
        Backend::Vulkan2 => extensions.khr_vulkan_enable2 = true,
        Backend::OpenGL => extensions.khr_opengl_enable = true,
        #[cfg(windows)]
        Backend::D3D11 => extensions.khr_d3d11_enable = true,
        #[cfg(windows)]
        Backend::D3D12 => extensions.khr_d3d12_enable = true,
        #[cfg(not(windows))]
        Backend::D3D11 | Backend::D3D12 => return false,
    }
    true
}

/// Live instance; `xr::Instance` destroys the handle on drop
struct OpenXrInstance {
    instance: xr::Instance,
    enabled: BackendAvailability,
}

fn xr_system(system: SystemId) -> sys::SystemId {
    sys::SystemId::from_raw(system.0)
}

fn api_version(version: xr::Version) -> ApiVersion {
    ApiVersion::new(version.major(), version.minor(), version.patch())
}

/// Query `xrGetVulkanGraphicsRequirementsKHR` through its raw entry point
fn legacy_vulkan_requirements(
    get_requirements: sys::pfn::GetVulkanGraphicsRequirementsKHR,
    instance: sys::Instance,
    system: sys::SystemId,
) -> RuntimeResult<GraphicsRequirements> {
    // SAFETY: plain C out-struct; zero is valid for every field.
    let mut requirements: sys::GraphicsRequirementsVulkanKHR = unsafe { std::mem::zeroed() };
    requirements.ty = sys::StructureType::GRAPHICS_REQUIREMENTS_VULKAN_KHR;
    // SAFETY: `get_requirements` was resolved for `instance`, and `requirements`
    // is a valid, typed out pointer for the duration of the call.
    check(unsafe { get_requirements(instance, system, &mut requirements) })?;
    Ok(GraphicsRequirements::ApiVersions {
        min: api_version(requirements.min_api_version_supported),
        max: api_version(requirements.max_api_version_supported),
    })
}

const fn xr_form_factor(form_factor: FormFactor) -> xr::FormFactor {
    match form_factor {
        FormFactor::Handheld => xr::FormFactor::HANDHELD_DISPLAY,
        FormFactor::HeadMounted => xr::FormFactor::HEAD_MOUNTED_DISPLAY,
    }
}

impl XrInstance for OpenXrInstance {
    fn system(&self, form_factor: FormFactor) -> RuntimeResult<SystemId> {
        let system = self.instance.system(xr_form_factor(form_factor))?;
        Ok(SystemId(system.into_raw()))
    }

    fn system_properties(&self, system: SystemId) -> RuntimeResult<SystemProperties> {
        let properties = self.instance.system_properties(xr_system(system))?;
        Ok(SystemProperties {
            system_name: properties.system_name,
            vendor_id: properties.vendor_id,
            tracking: TrackingProperties {
                orientation_tracking: properties.tracking_properties.orientation_tracking.into(),
                position_tracking: properties.tracking_properties.position_tracking.into(),
            },
            graphics: GraphicsProperties {
                max_layer_count: properties.graphics_properties.max_layer_count,
                max_swapchain_image_width: properties.graphics_properties.max_swapchain_image_width,
                max_swapchain_image_height: properties.graphics_properties.max_swapchain_image_height,
            },
        })
    }

    fn graphics_requirements(
        &self,
        system: SystemId,
        backend: Backend,
    ) -> RuntimeResult<GraphicsRequirements> {
        // The wrapper panics when asked about an extension it did not load
        if !self.enabled.contains(backend.flag()) {
            return Err(RuntimeError::BackendNotEnabled(backend));
        }

        let system = xr_system(system);
        match backend {
            Backend::Vulkan => {
                // `xr::Vulkan` switches to the enable2 query whenever enable2 is loaded
                let vulkan = self
                    .instance
                    .exts()
                    .khr_vulkan_enable
                    .as_ref()
                    .ok_or(RuntimeError::BackendNotEnabled(backend))?;
                legacy_vulkan_requirements(
                    vulkan.get_vulkan_graphics_requirements,
                    self.instance.as_raw(),
                    system,
                )
            }
            Backend::Vulkan2 => {
                let requirements = self.instance.graphics_requirements::<xr::Vulkan>(system)?;
                Ok(GraphicsRequirements::ApiVersions {
                    min: api_version(requirements.min_api_version_supported),
                    max: api_version(requirements.max_api_version_supported),
                })
            }
            Backend::OpenGL => {
                let requirements = self.instance.graphics_requirements::<xr::OpenGL>(system)?;
                Ok(GraphicsRequirements::ApiVersions {
                    min: api_version(requirements.min_api_version_supported),
                    max: api_version(requirements.max_api_version_supported),
                })
            }
            #[cfg(windows)]
            Backend::D3D11 => {
                let requirements = self.instance.graphics_requirements::<xr::D3D11>(system)?;
                #[allow(clippy::cast_sign_loss)]
                let level = requirements.min_feature_level as u32;
                Ok(GraphicsRequirements::FeatureLevel(level))
            }
            #[cfg(windows)]
            Backend::D3D12 => {
                let requirements = self.instance.graphics_requirements::<xr::D3D12>(system)?;
                #[allow(clippy::cast_sign_loss)]
                let level = requirements.min_feature_level as u32;
                Ok(GraphicsRequirements::FeatureLevel(level))
            }
            #[cfg(not(windows))]
            Backend::D3D11 | Backend::D3D12 => Err(RuntimeError::BackendNotEnabled(backend)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_string_stops_at_nul() {
        let mut raw = [0 as c_char; 16];
        for (slot, byte) in raw.iter_mut().zip(b"XR_EXT_test\0junk") {
            *slot = *byte as c_char;
        }
        assert_eq!(fixed_string(&raw), "XR_EXT_test");
    }

    #[test]
    fn test_fixed_string_without_nul() {
        let raw = [b'a' as c_char; 4];
        assert_eq!(fixed_string(&raw), "aaaa");
    }

    #[test]
    fn test_empty_buffer_passes_null() {
        let mut empty: [u32; 0] = [];
        assert!(buffer_ptr(&mut empty).is_null());
        assert_eq!(capacity(&empty), 0);

        let mut filled = [0u32; 3];
        assert!(!buffer_ptr(&mut filled).is_null());
        assert_eq!(capacity(&filled), 3);
    }

    #[test]
    fn test_form_factor_mapping() {
        assert_eq!(xr_form_factor(FormFactor::Handheld), xr::FormFactor::HANDHELD_DISPLAY);
        assert_eq!(
            xr_form_factor(FormFactor::HeadMounted),
            xr::FormFactor::HEAD_MOUNTED_DISPLAY
        );
    }

    unsafe extern "system" fn legacy_vulkan_1_0_to_1_3(
        _instance: sys::Instance,
        system: sys::SystemId,
        requirements: *mut sys::GraphicsRequirementsVulkanKHR,
    ) -> sys::Result {
        if system.into_raw() != 5
            || (*requirements).ty != sys::StructureType::GRAPHICS_REQUIREMENTS_VULKAN_KHR
        {
            return sys::Result::ERROR_VALIDATION_FAILURE;
        }
        (*requirements).min_api_version_supported = xr::Version::new(1, 0, 0);
        (*requirements).max_api_version_supported = xr::Version::new(1, 3, 0);
        sys::Result::SUCCESS
    }

    unsafe extern "system" fn legacy_vulkan_failing(
        _instance: sys::Instance,
        _system: sys::SystemId,
        _requirements: *mut sys::GraphicsRequirementsVulkanKHR,
    ) -> sys::Result {
        sys::Result::ERROR_RUNTIME_FAILURE
    }

    #[test]
    fn test_legacy_vulkan_requirements_use_legacy_entry_point() {
        let requirements = legacy_vulkan_requirements(
            legacy_vulkan_1_0_to_1_3,
            sys::Instance::from_raw(0),
            sys::SystemId::from_raw(5),
        );
        assert_eq!(
            requirements,
            Ok(GraphicsRequirements::ApiVersions {
                min: ApiVersion::new(1, 0, 0),
                max: ApiVersion::new(1, 3, 0),
            })
        );
    }

    #[test]
    fn test_legacy_vulkan_failure_is_decoded() {
        let requirements = legacy_vulkan_requirements(
            legacy_vulkan_failing,
            sys::Instance::from_raw(0),
            sys::SystemId::from_raw(5),
        );
        assert_eq!(
            requirements,
            Err(RuntimeError::Api {
                code: sys::Result::ERROR_RUNTIME_FAILURE.into_raw()
            })
        );
    }

    #[test]
    fn test_backend_flags_only_for_compiled_backends() {
        let mut extensions = xr::ExtensionSet::default();
        assert!(enable_backend(&mut extensions, Backend::Vulkan));
        assert!(extensions.khr_vulkan_enable);
        assert!(enable_backend(&mut extensions, Backend::OpenGL));
        assert!(extensions.khr_opengl_enable);
        assert_eq!(enable_backend(&mut extensions, Backend::D3D12), cfg!(windows));
    }
}
