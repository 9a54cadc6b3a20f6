//! Process-wide result codes.
//!
//! Every [`Envelope`](super::Envelope) decides success by comparing its code
//! with the success code registered here. The failure code is what the
//! default failure constructors use. The two can never be equal.

use std::sync::{PoisonError, RwLock};

use crate::{Error, Result};

/// The pair of codes shared by every envelope in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCodes {
    /// Code that marks an envelope as successful
    pub success: i32,
    /// Code used by failure constructors that take no explicit code
    pub fail: i32,
}

impl ResultCodes {
    /// Built-in codes: `0` for success, `-1` for failure.
    pub const DEFAULT: ResultCodes = ResultCodes {
        success: 0,
        fail: -1,
    };

    /// Check the pair can be installed.
    pub fn validate(&self) -> Result<()> {
        if self.success == self.fail {
            return Err(Error::InvalidArgument(format!(
                "failure code {} must differ from the success code",
                self.fail
            )));
        }
        Ok(())
    }
}

impl Default for ResultCodes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static CODES: RwLock<ResultCodes> = RwLock::new(ResultCodes::DEFAULT);

/// The currently registered codes.
pub fn result_codes() -> ResultCodes {
    *CODES.read().unwrap_or_else(PoisonError::into_inner)
}

/// The code that denotes success.
pub fn default_success() -> i32 {
    result_codes().success
}

/// The code failure constructors use by default.
pub fn default_fail() -> i32 {
    result_codes().fail
}

/// Replace both codes at once.
///
/// Fails with `InvalidArgument` and changes nothing if they are equal.
pub fn set_result_codes(codes: ResultCodes) -> Result<()> {
    codes.validate()?;
    *CODES.write().unwrap_or_else(PoisonError::into_inner) = codes;
    Ok(())
}

/// Replace the success code, keeping the failure code.
pub fn set_default_success(success: i32) -> Result<()> {
    update(|codes| codes.success = success)
}

/// Replace the failure code, keeping the success code.
pub fn set_default_fail(fail: i32) -> Result<()> {
    update(|codes| codes.fail = fail)
}

fn update(change: impl FnOnce(&mut ResultCodes)) -> Result<()> {
    let mut guard = CODES.write().unwrap_or_else(PoisonError::into_inner);
    let mut next = *guard;
    change(&mut next);
    next.validate()?;
    *guard = next;
    Ok(())
}
