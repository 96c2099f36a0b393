//! Runtime session bootstrap
//!
//! A [`Session`] exists only when instance creation succeeded, and it owns the
//! instance for as long as deeper queries run. Dropping it destroys the
//! instance; no other path can.

use crate::config::ProbeConfig;
use crate::runtime::{ApplicationInfo, RuntimeResult, XrInstance, XrRuntime};
use log::{debug, info};

/// Live runtime instance with scoped release
pub struct Session {
    instance: Box<dyn XrInstance>,
}

impl Session {
    /// Create an instance with the resolved extensions enabled
    pub fn bootstrap(
        runtime: &dyn XrRuntime,
        config: &ProbeConfig,
        enabled_extensions: &[&str],
    ) -> RuntimeResult<Self> {
        let app = ApplicationInfo {
            application_name: &config.application_name,
            application_version: config.application_version,
            engine_name: &config.engine_name,
            engine_version: config.engine_version,
        };

        debug!("Creating instance with extensions {enabled_extensions:?}");
        let instance = runtime.create_instance(&app, enabled_extensions)?;
        info!("Created OpenXR instance");
        Ok(Self { instance })
    }

    /// Borrow the instance for queries
    pub fn instance(&self) -> &dyn XrInstance {
        self.instance.as_ref()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Destroying OpenXR instance");
    }
}
