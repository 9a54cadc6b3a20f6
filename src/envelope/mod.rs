//! Uniform success/failure response envelope.
//!
//! An [`Envelope`] carries a result code, an optional message, an optional
//! error trace and a keyed JSON payload. Success is decided against the
//! process-wide codes in [`codes`].
//!
//! Serialized form:
//!
//! ```json
//! {"resultCode": 0, "message": null, "data": {}, "errorStackTrace": null, "success": true}
//! ```

mod accessors;
pub mod codes;

pub use accessors::DATE_FORMAT;
pub use codes::{
    ResultCodes, default_fail, default_success, result_codes, set_default_fail,
    set_default_success, set_result_codes,
};

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Keyed payload attached to an envelope.
pub type Payload = HashMap<String, Value>;

/// A success or failure result with an attached payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default = "default_success")]
    result_code: i32,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Payload,
    #[serde(default)]
    error_stack_trace: Option<String>,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::success()
    }
}

// Construction

impl Envelope {
    fn with_code(result_code: i32, message: Option<String>) -> Self {
        Self {
            result_code,
            message,
            data: Payload::new(),
            error_stack_trace: None,
        }
    }

    /// A successful envelope with no message.
    pub fn success() -> Self {
        Self::with_code(default_success(), None)
    }

    /// A successful envelope with a message.
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self::with_code(default_success(), Some(message.into()))
    }

    /// A failure with the default failure code.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::with_code(default_fail(), Some(message.into()))
    }

    /// A failure built from an error: the message is the error's display
    /// and the error chain is captured as the trace.
    pub fn fail_from_error(error: &(dyn StdError + 'static)) -> Self {
        Self::fail_with_error(error.to_string(), error)
    }

    /// A failure with a message and a captured error chain.
    pub fn fail_with_error(message: impl Into<String>, error: &(dyn StdError + 'static)) -> Self {
        let mut envelope = Self::fail(message);
        envelope.error_stack_trace = Some(error_trace(error));
        envelope
    }

    /// A failure with an explicit code.
    ///
    /// Fails with `InvalidArgument` if `code` is the success code.
    pub fn fail_with_code(code: i32, message: impl Into<String>) -> Result<Self> {
        Self::fail_with_code_and_error(code, message, None)
    }

    /// A failure with an explicit code and an optional captured error.
    ///
    /// Fails with `InvalidArgument` if `code` is the success code.
    pub fn fail_with_code_and_error(
        code: i32,
        message: impl Into<String>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Result<Self> {
        if code == default_success() {
            return Err(Error::InvalidArgument(format!(
                "failure code {} cannot equal the success code",
                code
            )));
        }

        let mut envelope = Self::with_code(code, Some(message.into()));
        envelope.error_stack_trace = error.map(error_trace);
        Ok(envelope)
    }
}

/// Render an error and its `source()` chain, one cause per line.
pub fn error_trace(error: &(dyn StdError + 'static)) -> String {
    let mut trace = error.to_string();
    let mut previous = trace.clone();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // `#[from]` wrappers already print their source
        if !previous.contains(&text) {
            trace.push_str("\nCaused by: ");
            trace.push_str(&text);
        }
        previous = text;
        source = cause.source();
    }
    trace
}

// Fields

impl Envelope {
    pub fn result_code(&self) -> i32 {
        self.result_code
    }

    pub fn set_result_code(&mut self, result_code: i32) {
        self.result_code = result_code;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    pub fn error_stack_trace(&self) -> Option<&str> {
        self.error_stack_trace.as_deref()
    }

    pub fn set_error_stack_trace(&mut self, trace: Option<String>) {
        self.error_stack_trace = trace;
    }

    /// True iff the code equals the current success code.
    pub fn is_success(&self) -> bool {
        self.result_code == default_success()
    }
}

// Payload

impl Envelope {
    /// The attached payload.
    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// Replace the payload with a copy of `data`.
    pub fn set_data(&mut self, data: &Payload) {
        self.data = data.clone();
    }

    /// Store a single value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Store a single value, builder style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Store any serializable value under `key`.
    pub fn set_value<T>(mut self, key: impl Into<String>, value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.data.insert(key.into(), value);
        Ok(self)
    }

    /// Replace the payload with a copy of `data`.
    pub fn set_all(mut self, data: &Payload) -> Self {
        self.set_data(data);
        self
    }

    /// Copy every entry of `data` over the current payload.
    pub fn merge_all(mut self, data: &Payload) -> Self {
        self.data
            .extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// The raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

// Conditional combinators

impl Envelope {
    /// Split into `Ok` on success and `Err` on failure for pattern matching.
    pub fn into_result(self) -> std::result::Result<Self, Self> {
        if self.is_success() { Ok(self) } else { Err(self) }
    }

    /// Run `f` if successful.
    pub fn when_success(self, f: impl FnOnce(&Self)) -> Self {
        if self.is_success() {
            f(&self);
        }
        self
    }

    /// Run `f` if failed.
    pub fn when_fail(self, f: impl FnOnce(&Self)) -> Self {
        if !self.is_success() {
            f(&self);
        }
        self
    }

    /// Replace with the envelope produced by `next` if successful.
    pub fn when_success_then(self, next: impl FnOnce() -> Envelope) -> Envelope {
        if self.is_success() { next() } else { self }
    }

    /// Turn a failure into an error produced by `f`.
    pub fn fail_then_err<E>(self, f: impl FnOnce(&Self) -> E) -> std::result::Result<Self, E> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(f(&self))
        }
    }

    /// A value computed from a successful envelope, `None` on failure.
    pub fn succeed_then_return<T>(&self, f: impl FnOnce(&Self) -> T) -> Option<T> {
        self.is_success().then(|| f(self))
    }

    /// A value computed from a failed envelope, `None` on success.
    pub fn fail_then_return<T>(&self, f: impl FnOnce(&Self) -> T) -> Option<T> {
        (!self.is_success()).then(|| f(self))
    }
}

impl Serialize for Envelope {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Envelope", 5)?;
        state.serialize_field("resultCode", &self.result_code)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("data", &self.data)?;
        state.serialize_field("errorStackTrace", &self.error_stack_trace)?;
        state.serialize_field("success", &self.is_success())?;
        state.end()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        write!(
            f,
            "Envelope{{resultCode={}, message='{}', data={}, exception={}}}",
            self.result_code,
            self.message.as_deref().unwrap_or("null"),
            data,
            self.error_stack_trace.as_deref().unwrap_or("null"),
        )
    }
}
