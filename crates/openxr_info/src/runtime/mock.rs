//! Scripted runtime for tests

use super::{
    ApiVersion, ApplicationInfo, ExtensionProperties, FormFactor, GraphicsProperties,
    GraphicsRequirements, LayerProperties, RuntimeError, RuntimeResult, SystemId,
    SystemProperties, TrackingProperties, XrInstance, XrRuntime,
};
use crate::backend::Backend;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Generic failure code used by scripted errors
pub(crate) const RUNTIME_FAILURE: RuntimeError = RuntimeError::Api { code: -2 };

/// Script for the queries a created instance answers
#[derive(Debug, Clone, Default)]
pub(crate) struct InstanceScript {
    systems: HashMap<FormFactor, RuntimeResult<SystemId>>,
    properties: HashMap<SystemId, RuntimeResult<SystemProperties>>,
    requirements: HashMap<(SystemId, Backend), RuntimeResult<GraphicsRequirements>>,
}

/// In-memory runtime returning whatever it was scripted with
#[derive(Debug)]
pub(crate) struct MockRuntime {
    layers: RuntimeResult<Vec<LayerProperties>>,
    instance_extensions: RuntimeResult<Vec<ExtensionProperties>>,
    layer_extensions: HashMap<String, RuntimeResult<Vec<ExtensionProperties>>>,
    instance: RuntimeResult<InstanceScript>,
    created_with: RefCell<Vec<Vec<String>>>,
    live_instances: Rc<Cell<usize>>,
    released_instances: Rc<Cell<usize>>,
}

pub(crate) fn extension(name: &str, version: u32) -> ExtensionProperties {
    ExtensionProperties { name: name.to_string(), version }
}

/// Properties of a typical head-mounted system
pub(crate) fn hmd_properties(name: &str) -> SystemProperties {
    SystemProperties {
        system_name: name.to_string(),
        vendor_id: 0x2833,
        tracking: TrackingProperties {
            orientation_tracking: true,
            position_tracking: true,
        },
        graphics: GraphicsProperties {
            max_layer_count: 16,
            max_swapchain_image_width: 4096,
            max_swapchain_image_height: 4096,
        },
    }
}

pub(crate) const fn version_range(min: (u16, u16), max: (u16, u16)) -> GraphicsRequirements {
    GraphicsRequirements::ApiVersions {
        min: ApiVersion::new(min.0, min.1, 0),
        max: ApiVersion::new(max.0, max.1, 0),
    }
}

impl MockRuntime {
    /// Runtime with no layers or extensions whose instance creation succeeds
    pub(crate) fn new() -> Self {
        Self {
            layers: Ok(Vec::new()),
            instance_extensions: Ok(Vec::new()),
            layer_extensions: HashMap::new(),
            instance: Ok(InstanceScript::default()),
            created_with: RefCell::new(Vec::new()),
            live_instances: Rc::new(Cell::new(0)),
            released_instances: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn with_instance_extensions(mut self, names: &[&str]) -> Self {
        self.instance_extensions = Ok(names.iter().map(|name| extension(name, 1)).collect());
        self
    }

    pub(crate) fn with_layer(mut self, name: &str, version: u32, extensions: &[&str]) -> Self {
        if let Ok(layers) = self.layers.as_mut() {
            layers.push(LayerProperties {
                name: name.to_string(),
                version,
                description: format!("{name} description"),
            });
        }
        self.layer_extensions.insert(
            name.to_string(),
            Ok(extensions.iter().map(|ext| extension(ext, version)).collect()),
        );
        self
    }

    pub(crate) fn with_failing_layers(mut self, error: RuntimeError) -> Self {
        self.layers = Err(error);
        self
    }

    pub(crate) fn with_failing_instance_extensions(mut self, error: RuntimeError) -> Self {
        self.instance_extensions = Err(error);
        self
    }

    pub(crate) fn with_failing_layer_extensions(mut self, layer: &str, error: RuntimeError) -> Self {
        self.layer_extensions.insert(layer.to_string(), Err(error));
        self
    }

    pub(crate) fn with_failing_instance(mut self, error: RuntimeError) -> Self {
        self.instance = Err(error);
        self
    }

    pub(crate) fn with_system(mut self, form_factor: FormFactor, result: RuntimeResult<SystemId>) -> Self {
        if let Ok(script) = self.instance.as_mut() {
            script.systems.insert(form_factor, result);
        }
        self
    }

    pub(crate) fn with_properties(mut self, system: SystemId, result: RuntimeResult<SystemProperties>) -> Self {
        if let Ok(script) = self.instance.as_mut() {
            script.properties.insert(system, result);
        }
        self
    }

    pub(crate) fn with_requirements(
        mut self,
        system: SystemId,
        backend: Backend,
        result: RuntimeResult<GraphicsRequirements>,
    ) -> Self {
        if let Ok(script) = self.instance.as_mut() {
            script.requirements.insert((system, backend), result);
        }
        self
    }

    /// Extension lists passed to every `create_instance` call so far
    pub(crate) fn created_with(&self) -> Vec<Vec<String>> {
        self.created_with.borrow().clone()
    }

    pub(crate) fn live_instances(&self) -> usize {
        self.live_instances.get()
    }

    pub(crate) fn released_instances(&self) -> usize {
        self.released_instances.get()
    }
}

impl XrRuntime for MockRuntime {
    fn enumerate_layers(&self) -> RuntimeResult<Vec<LayerProperties>> {
        self.layers.clone()
    }

    fn enumerate_extensions(&self, layer: Option<&str>) -> RuntimeResult<Vec<ExtensionProperties>> {
        match layer {
            None => self.instance_extensions.clone(),
            Some(name) => self
                .layer_extensions
                .get(name)
                .cloned()
                .unwrap_or(Err(RUNTIME_FAILURE)),
        }
    }

    fn create_instance(
        &self,
        _app: &ApplicationInfo<'_>,
        enabled_extensions: &[&str],
    ) -> RuntimeResult<Box<dyn XrInstance>> {
        self.created_with
            .borrow_mut()
            .push(enabled_extensions.iter().map(ToString::to_string).collect());

        let script = self.instance.clone()?;
        self.live_instances.set(self.live_instances.get() + 1);
        Ok(Box::new(MockInstance {
            script,
            live: Rc::clone(&self.live_instances),
            released: Rc::clone(&self.released_instances),
        }))
    }
}

struct MockInstance {
    script: InstanceScript,
    live: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl XrInstance for MockInstance {
    fn system(&self, form_factor: FormFactor) -> RuntimeResult<SystemId> {
        self.script
            .systems
            .get(&form_factor)
            .cloned()
            .unwrap_or(Err(RuntimeError::FormFactorUnsupported))
    }

    fn system_properties(&self, system: SystemId) -> RuntimeResult<SystemProperties> {
        self.script
            .properties
            .get(&system)
            .cloned()
            .unwrap_or(Err(RUNTIME_FAILURE))
    }

    fn graphics_requirements(
        &self,
        system: SystemId,
        backend: Backend,
    ) -> RuntimeResult<GraphicsRequirements> {
        self.script
            .requirements
            .get(&(system, backend))
            .cloned()
            .unwrap_or(Err(RuntimeError::BackendNotEnabled(backend)))
    }
}

impl Drop for MockInstance {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        self.released.set(self.released.get() + 1);
    }
}
