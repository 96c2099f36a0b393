//! # OpenXR Info
//!
//! Capability probing for an installed OpenXR runtime.
//!
//! A single discovery pass queries the runtime for its API layers, its
//! extensions (including the ones contributed by each layer), the graphics
//! backends it can interoperate with, and the form factors it can drive, and
//! folds the answers into one serializable [`ReportDocument`].
//!
//! ## Pipeline
//!
//! - **Registry**: layer and extension enumeration with provenance
//! - **Backend**: graphics backend availability from the extension set
//! - **Session**: runtime instance bootstrap with scoped release
//! - **Probe**: per form factor system resolution
//! - **Collector**: system properties and per-backend graphics requirements
//! - **Report**: the nested document written to `report.json`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openxr_info::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProbeConfig::default();
//!     let runtime = OpenXrRuntime::load()?;
//!     let document = Discovery::new(&runtime, &config).run();
//!     document.write_to(&config.output_path)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod collector;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod probe;
pub mod registry;
pub mod report;
pub mod runtime;
pub mod session;

pub use config::{ConfigError, ProbeConfig};
pub use pipeline::Discovery;
pub use report::{Report, ReportDocument, ReportError};
pub use runtime::{RuntimeError, RuntimeResult};

/// Common imports for tool and test code
pub mod prelude {
    pub use crate::{
        backend::{Backend, BackendAvailability, BackendDescriptor, BackendResolution},
        config::{ConfigError, ProbeConfig},
        pipeline::Discovery,
        probe::{FormFactorProbe, ProbeOutcome},
        registry::CapabilityRegistry,
        report::{Report, ReportDocument, ReportError, SystemReport},
        runtime::{
            loader::OpenXrRuntime, FormFactor, RuntimeError, RuntimeResult, SystemId, XrInstance,
            XrRuntime,
        },
        session::Session,
    };
}
