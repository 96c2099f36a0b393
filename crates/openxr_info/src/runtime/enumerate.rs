//! Two-call enumeration
//!
//! OpenXR enumerations are issued twice: once with an empty buffer to learn
//! the count, then with a buffer of that size. The count returned by the fill
//! call is authoritative. If the registry grew in between, the fill call
//! reports `XR_ERROR_SIZE_INSUFFICIENT` (or succeeds with a count larger than
//! its buffer) and the whole round is repeated.

use super::{RuntimeError, RuntimeResult};
use openxr::sys;

/// Count/fill rounds attempted before giving up on a changing registry
pub const MAX_ENUMERATION_ATTEMPTS: usize = 3;

/// Map a raw result to an error, treating every non-negative code as success
pub fn check(result: sys::Result) -> RuntimeResult<()> {
    if result.into_raw() >= 0 {
        Ok(())
    } else {
        Err(RuntimeError::from(result))
    }
}

impl From<sys::Result> for RuntimeError {
    fn from(result: sys::Result) -> Self {
        if result == sys::Result::ERROR_FORM_FACTOR_UNAVAILABLE {
            Self::FormFactorUnavailable
        } else if result == sys::Result::ERROR_FORM_FACTOR_UNSUPPORTED {
            Self::FormFactorUnsupported
        } else {
            Self::Api { code: result.into_raw() }
        }
    }
}

/// Run the two-call pattern
///
/// `call` receives the output buffer (empty for the count call) and the count
/// slot. `template` initializes freshly allocated elements.
pub fn two_call<T, F>(template: T, mut call: F) -> RuntimeResult<Vec<T>>
where
    T: Clone,
    F: FnMut(&mut [T], &mut u32) -> sys::Result,
{
    for attempt in 1..=MAX_ENUMERATION_ATTEMPTS {
        let mut count = 0u32;
        check(call(&mut [], &mut count))?;

        let mut items = vec![template.clone(); count as usize];
        let result = call(&mut items, &mut count);
        if result == sys::Result::ERROR_SIZE_INSUFFICIENT {
            log::debug!("Enumeration count changed between calls (attempt {attempt}), retrying");
            continue;
        }
        check(result)?;

        // A zero-capacity fill call succeeds while still reporting the new count
        if count as usize > items.len() {
            log::debug!("Enumeration grew past the buffer (attempt {attempt}), retrying");
            continue;
        }

        items.truncate(count as usize);
        return Ok(items);
    }

    Err(RuntimeError::EnumerationUnstable {
        attempts: MAX_ENUMERATION_ATTEMPTS,
    })
}
