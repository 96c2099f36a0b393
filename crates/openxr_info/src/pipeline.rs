//! # Discovery Pipeline
//!
//! Runs one strictly sequential pass:
//! registry query, backend resolution, session bootstrap, form factor probe,
//! system collection, report assembly. The report under construction is owned
//! by the pass and only ever grows.

use crate::backend::{self, BackendDescriptor, BackendResolution};
use crate::collector::SystemCollector;
use crate::config::ProbeConfig;
use crate::probe::FormFactorProbe;
use crate::registry::CapabilityRegistry;
use crate::report::{Report, ReportDocument};
use crate::runtime::XrRuntime;
use crate::session::Session;
use log::{info, warn};

/// One discovery pass against a runtime
pub struct Discovery<'a> {
    runtime: &'a dyn XrRuntime,
    config: &'a ProbeConfig,
    backends: Vec<BackendDescriptor>,
}

impl<'a> Discovery<'a> {
    /// Discovery over the backends this build supports
    pub fn new(runtime: &'a dyn XrRuntime, config: &'a ProbeConfig) -> Self {
        Self {
            runtime,
            config,
            backends: backend::platform_backends(),
        }
    }

    /// Replace the backend table
    #[must_use]
    pub fn with_backends(mut self, backends: &[BackendDescriptor]) -> Self {
        self.backends = backends.to_vec();
        self
    }

    /// Run the full pass and return the assembled document
    pub fn run(&self) -> ReportDocument {
        let mut report = Report::new(self.config.report_version.clone());

        let registry = CapabilityRegistry::query(self.runtime);
        report.layer_list = registry.layer_records();
        report.extension_list = registry.extension_records();

        let resolution = backend::resolve(&registry.extensions, &self.backends);
        self.inspect_systems(&resolution, &mut report);

        ReportDocument::new(report)
    }

    fn inspect_systems(&self, resolution: &BackendResolution, report: &mut Report) {
        let session = match Session::bootstrap(
            self.runtime,
            self.config,
            &resolution.enabled_extensions,
        ) {
            Ok(session) => session,
            Err(e) => {
                warn!("Cannot create instance ({e}). Will not query XrSystems");
                return;
            }
        };

        let probes = FormFactorProbe::run_all(session.instance());
        let collector = SystemCollector::new(session.instance(), &self.backends, resolution);
        for probe in probes {
            if let Some(system) = probe.outcome.system() {
                if let Some(system_report) = collector.collect(probe.form_factor, system) {
                    report.insert_system(probe.form_factor, system_report);
                }
            }
        }

        if report.xr_system.is_none() {
            info!("No XR system could be inspected");
        }
    }
}

/// Document for a run where no runtime could be loaded at all
pub fn empty_document(config: &ProbeConfig) -> ReportDocument {
    ReportDocument::new(Report::new(config.report_version.clone()))
}
