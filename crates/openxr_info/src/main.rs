//! openxr_info: probe the installed OpenXR runtime and write `report.json`

use openxr_info::logging;
use openxr_info::pipeline::{empty_document, Discovery};
use openxr_info::prelude::*;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let config = ProbeConfig::default();
    if let Err(e) = config.validate() {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }

    let document = match OpenXrRuntime::load() {
        Ok(runtime) => Discovery::new(&runtime, &config).run(),
        Err(e) => {
            log::warn!("{e}. Writing an empty report");
            empty_document(&config)
        }
    };

    // The report is the only deliverable, so a failed write fails the run
    match document.write_to(&config.output_path) {
        Ok(()) => {
            log::info!("See report file in : {}", config.output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
