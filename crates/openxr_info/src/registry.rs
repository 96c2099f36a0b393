//! # Capability Registry Query
//!
//! Collects every installed API layer and every visible extension: the
//! runtime's own extensions first, then each layer's contributed extensions in
//! layer enumeration order. A name to layer lookup records which layer
//! provided an extension; on duplicate names the last enumerated layer wins,
//! while the flat list keeps every occurrence.

use crate::report::{ExtensionRecord, LayerRecord};
use crate::runtime::{ExtensionProperties, LayerProperties, XrRuntime};
use log::{info, warn};
use std::collections::HashMap;

/// Layers and extensions discovered in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityRegistry {
    /// Installed API layers
    pub layers: Vec<LayerProperties>,
    /// Runtime extensions followed by each layer's extensions
    pub extensions: Vec<ExtensionProperties>,
    /// Extension name to the name of the last layer providing it
    pub provided_by: HashMap<String, String>,
}

impl CapabilityRegistry {
    /// Query the runtime
    ///
    /// Failures never abort the query: a failed enumeration contributes
    /// nothing and is logged.
    pub fn query(runtime: &dyn XrRuntime) -> Self {
        let layers = runtime.enumerate_layers().unwrap_or_else(|e| {
            warn!("Cannot enumerate API layers: {e}");
            Vec::new()
        });

        let mut extensions = runtime.enumerate_extensions(None).unwrap_or_else(|e| {
            warn!("Cannot enumerate instance extensions: {e}");
            Vec::new()
        });

        let mut provided_by = HashMap::new();
        for layer in &layers {
            match runtime.enumerate_extensions(Some(&layer.name)) {
                Ok(layer_extensions) => {
                    for extension in &layer_extensions {
                        provided_by.insert(extension.name.clone(), layer.name.clone());
                    }
                    extensions.extend(layer_extensions);
                }
                Err(e) => warn!("Cannot enumerate extensions of layer {}: {e}", layer.name),
            }
        }

        let registry = Self {
            layers,
            extensions,
            provided_by,
        };
        registry.log_summary();
        registry
    }

    /// Layer that provided an extension, if any
    pub fn provider_of(&self, extension: &str) -> Option<&str> {
        self.provided_by.get(extension).map(String::as_str)
    }

    /// Layers shaped for the report
    pub fn layer_records(&self) -> Vec<LayerRecord> {
        self.layers
            .iter()
            .map(|layer| LayerRecord {
                name: layer.name.clone(),
                version: layer.version,
                description: layer.description.clone(),
            })
            .collect()
    }

    /// Extensions shaped for the report, annotated with their provider
    pub fn extension_records(&self) -> Vec<ExtensionRecord> {
        self.extensions
            .iter()
            .map(|extension| ExtensionRecord {
                name: extension.name.clone(),
                version: extension.version,
                provided_by: self.provider_of(&extension.name).map(str::to_string),
            })
            .collect()
    }

    fn log_summary(&self) {
        info!("Api Layers :");
        for layer in &self.layers {
            info!("{} version {}", layer.name, layer.version);
        }

        info!("All extensions (including layer ones) :");
        for extension in &self.extensions {
            match self.provider_of(&extension.name) {
                Some(layer) => info!(
                    "{} version {} is provided by {}",
                    extension.name, extension.version, layer
                ),
                None => info!("{} version {}", extension.name, extension.version),
            }
        }
    }
}
