//! Typed accessors over the envelope payload.
//!
//! Every fallible accessor returns `Ok(None)` for a missing or `null` key
//! and `Error::Coercion` when the stored value cannot be converted. The
//! `_or` variants take a default and never fail.

use std::any::type_name;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Envelope;
use crate::{Error, Result};

/// Text format accepted by [`Envelope::get_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Strings are used as-is, everything else by its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coercion_error<T>(key: &str) -> Error {
    Error::Coercion {
        key: key.to_string(),
        target: type_name::<T>(),
    }
}

/// Parse an integral value, dropping anything from the first `.` on.
fn parse_integral<T: std::str::FromStr>(value: &Value) -> Option<T> {
    let text = value_text(value);
    let whole = match text.find('.') {
        Some(dot) => &text[..dot],
        None => &text,
    };
    whole.parse().ok()
}

fn parse_date(value: &Value) -> Option<DateTime<Local>> {
    let millis = match value {
        Value::Number(n) => Some(n.as_i64()?),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.parse::<i64>().ok()?)
        }
        _ => None,
    };

    if let Some(millis) = millis {
        return Local.timestamp_millis_opt(millis).single();
    }

    let naive = NaiveDateTime::parse_from_str(&value_text(value), DATE_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

impl Envelope {
    fn coerce<T>(&self, key: &str, convert: impl FnOnce(&Value) -> Option<T>) -> Result<Option<T>> {
        match self.data.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| coercion_error::<T>(key)),
        }
    }

    pub fn get_integer(&self, key: &str) -> Result<Option<i32>> {
        self.coerce(key, parse_integral)
    }

    pub fn get_integer_or(&self, key: &str, default: i32) -> i32 {
        self.get_integer(key).ok().flatten().unwrap_or(default)
    }

    pub fn get_long(&self, key: &str) -> Result<Option<i64>> {
        self.coerce(key, parse_integral)
    }

    pub fn get_long_or(&self, key: &str, default: i64) -> i64 {
        self.get_long(key).ok().flatten().unwrap_or(default)
    }

    pub fn get_double(&self, key: &str) -> Result<Option<f64>> {
        self.coerce(key, |value| value_text(value).parse().ok())
    }

    pub fn get_double_or(&self, key: &str, default: f64) -> f64 {
        self.get_double(key).ok().flatten().unwrap_or(default)
    }

    /// A timestamp stored as epoch milliseconds (number or all-digit
    /// string) or as local time text in [`DATE_FORMAT`].
    pub fn get_date(&self, key: &str) -> Result<Option<DateTime<Local>>> {
        self.coerce(key, parse_date)
    }

    pub fn get_date_or(&self, key: &str, default: DateTime<Local>) -> DateTime<Local> {
        self.get_date(key).ok().flatten().unwrap_or(default)
    }

    /// True iff the stored text is `true`, ignoring case.
    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        match self.data.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value_text(value).eq_ignore_ascii_case("true")),
        }
    }

    pub fn get_boolean_or(&self, key: &str, default: bool) -> bool {
        self.get_boolean(key).unwrap_or(default)
    }

    /// The stored value as text, or an empty string.
    pub fn get_string(&self, key: &str) -> String {
        self.get_string_or(key, "")
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        match self.data.get(key) {
            None | Some(Value::Null) => default.to_string(),
            Some(value) => value_text(value),
        }
    }

    /// Deserialize the stored value into `T`.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.coerce(key, |value| T::deserialize(value).ok())
    }

    pub fn get_object_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_object(key).ok().flatten().unwrap_or(default)
    }

    /// Convert each element of a stored array with `convert`.
    pub fn get_list_with<T>(
        &self,
        key: &str,
        convert: impl FnMut(&Value) -> T,
    ) -> Result<Option<Vec<T>>> {
        match self.data.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.iter().map(convert).collect())),
            Some(_) => Err(Error::NotAList(key.to_string())),
        }
    }

    /// Deserialize each element of a stored array into `T`.
    pub fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        match self.data.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| T::deserialize(item).map_err(|_| coercion_error::<T>(key)))
                .collect::<Result<Vec<T>>>()
                .map(Some),
            Some(_) => Err(Error::NotAList(key.to_string())),
        }
    }
}
