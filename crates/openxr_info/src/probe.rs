//! Form factor probing
//!
//! Each form factor is asked for a system exactly once and the answer is
//! decoded into a [`ProbeOutcome`]. Handheld is probed before head-mounted.

use crate::runtime::{FormFactor, RuntimeError, SystemId, XrInstance};
use log::{info, warn};

/// Terminal outcome of probing one form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A system was resolved
    Available(SystemId),
    /// Recognized, but no device is present right now
    Unavailable,
    /// Never supported by this runtime
    Unsupported,
    /// Anything else
    UnspecifiedError,
}

impl ProbeOutcome {
    /// Classify a system query result
    pub fn classify(result: &Result<SystemId, RuntimeError>) -> Self {
        match result {
            Ok(system) if !system.is_null() => Self::Available(*system),
            Ok(_) => Self::UnspecifiedError,
            Err(RuntimeError::FormFactorUnavailable) => Self::Unavailable,
            Err(RuntimeError::FormFactorUnsupported) => Self::Unsupported,
            Err(_) => Self::UnspecifiedError,
        }
    }

    /// Resolved system, if any
    pub const fn system(self) -> Option<SystemId> {
        match self {
            Self::Available(system) => Some(system),
            _ => None,
        }
    }
}

/// Probe result for one form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFactorProbe {
    /// Probed form factor
    pub form_factor: FormFactor,
    /// What the runtime answered
    pub outcome: ProbeOutcome,
}

impl FormFactorProbe {
    /// Ask the instance for a system of this form factor
    pub fn run(instance: &dyn XrInstance, form_factor: FormFactor) -> Self {
        let result = instance.system(form_factor);
        let outcome = ProbeOutcome::classify(&result);

        match (outcome, &result) {
            (ProbeOutcome::Available(_), _) => {
                info!("XR instance does support a {form_factor} XR system");
            }
            (ProbeOutcome::Unavailable, _) => {
                info!("{form_factor} XR system is currently unavailable");
            }
            (ProbeOutcome::Unsupported, _) => {
                info!("XR instance does not support {form_factor} mode");
            }
            (ProbeOutcome::UnspecifiedError, Err(e)) => {
                warn!("Unspecified error getting {form_factor} system: {e}");
            }
            (ProbeOutcome::UnspecifiedError, Ok(_)) => {
                warn!("Unspecified error getting {form_factor} system: null system id");
            }
        }

        Self { form_factor, outcome }
    }

    /// Probe every form factor in order
    pub fn run_all(instance: &dyn XrInstance) -> Vec<Self> {
        FormFactor::ALL
            .iter()
            .map(|&form_factor| Self::run(instance, form_factor))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::runtime::mock::{MockRuntime, RUNTIME_FAILURE};
    use crate::session::Session;

    #[test]
    fn test_classification() {
        assert_eq!(
            ProbeOutcome::classify(&Ok(SystemId(7))),
            ProbeOutcome::Available(SystemId(7))
        );
        assert_eq!(ProbeOutcome::classify(&Ok(SystemId::NULL)), ProbeOutcome::UnspecifiedError);
        assert_eq!(
            ProbeOutcome::classify(&Err(RuntimeError::FormFactorUnavailable)),
            ProbeOutcome::Unavailable
        );
        assert_eq!(
            ProbeOutcome::classify(&Err(RuntimeError::FormFactorUnsupported)),
            ProbeOutcome::Unsupported
        );
        assert_eq!(ProbeOutcome::classify(&Err(RUNTIME_FAILURE)), ProbeOutcome::UnspecifiedError);
    }

    #[test]
    fn test_run_all_probes_handheld_first() {
        let runtime = MockRuntime::new()
            .with_system(FormFactor::Handheld, Err(RuntimeError::FormFactorUnavailable))
            .with_system(FormFactor::HeadMounted, Ok(SystemId(42)));
        let session = Session::bootstrap(&runtime, &ProbeConfig::default(), &[]).unwrap();

        let probes = FormFactorProbe::run_all(session.instance());
        assert_eq!(
            probes,
            vec![
                FormFactorProbe {
                    form_factor: FormFactor::Handheld,
                    outcome: ProbeOutcome::Unavailable,
                },
                FormFactorProbe {
                    form_factor: FormFactor::HeadMounted,
                    outcome: ProbeOutcome::Available(SystemId(42)),
                },
            ]
        );
        assert_eq!(probes[1].outcome.system(), Some(SystemId(42)));
        assert_eq!(probes[0].outcome.system(), None);
    }
}
