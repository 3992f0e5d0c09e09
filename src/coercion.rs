// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed coercion of wire fields.
//!
//! Reading and writing follow different failure policies:
//!
//! - **Read path.** Integer and boolean fields are telemetry or identity
//!   details; a malformed value is logged as a warning and the field is left
//!   unset, but the read succeeds. Temperature fields are what callers act
//!   on, so a value that is neither numeric nor a sentinel fails the read.
//! - **Write path.** A [`FieldWriter`] formats outgoing fields. In
//!   [`Strictness::Strict`] mode a missing field is an error; in
//!   [`Strictness::Lenient`] mode it is skipped, which is what partial
//!   control updates need.

use crate::error::ParseError;
use crate::types::{Setpoint, Temperature};
use crate::wire::RawRecord;

/// Wire literals meaning "no value".
pub const UNKNOWN_SENTINELS: [&str; 2] = ["-", "--"];

/// Parses an integer field value.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if `value` is not a decimal integer.
pub fn parse_int(value: &str) -> Result<i64, ParseError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid("integer", value))
}

/// Parses a boolean field value.
///
/// The wire carries booleans as integers; any non-zero value is `true`.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if `value` is not an integer.
pub fn parse_bool(value: &str) -> Result<bool, ParseError> {
    parse_int(value)
        .map(|v| v != 0)
        .map_err(|_| invalid("boolean", value))
}

/// Parses a temperature (or humidity) reading.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if `value` is neither a finite number
/// nor one of the [`UNKNOWN_SENTINELS`].
///
/// # Examples
///
/// ```
/// use daikin_lib::coercion::parse_temperature;
/// use daikin_lib::types::Temperature;
///
/// assert_eq!(parse_temperature("21.5").unwrap(), Temperature::Celsius(21.5));
/// assert_eq!(parse_temperature("-").unwrap(), Temperature::Unknown);
/// assert_eq!(parse_temperature("--").unwrap(), Temperature::Unknown);
/// assert!(parse_temperature("abc").is_err());
/// ```
pub fn parse_temperature(value: &str) -> Result<Temperature, ParseError> {
    let trimmed = value.trim();
    if UNKNOWN_SENTINELS.contains(&trimmed) {
        return Ok(Temperature::Unknown);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Temperature::Celsius(v)),
        _ => Err(invalid("temperature", value)),
    }
}

/// Parses a setpoint, which additionally accepts the manual sentinel `M`.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` for anything else that
/// [`parse_temperature`] rejects.
pub fn parse_setpoint(value: &str) -> Result<Setpoint, ParseError> {
    if value.trim() == Setpoint::MANUAL_LITERAL {
        return Ok(Setpoint::Manual);
    }
    parse_temperature(value).map(Setpoint::from)
}

/// Formats an integer for the wire.
#[must_use]
pub fn format_int(value: i64) -> String {
    value.to_string()
}

/// Formats a boolean for the wire (`0` or `1`).
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Formats a setpoint for the wire.
#[must_use]
pub fn format_temperature(value: Setpoint) -> String {
    value.wire_value()
}

// ============================================================================
// Read rules applied to named fields
// ============================================================================

/// Reads an integer field.
///
/// A missing field is `None`. A malformed field is logged and also `None`.
#[must_use]
pub fn int_field(record: &RawRecord, field: &str) -> Option<i64> {
    let raw = record.get(field)?;
    parse_int(raw)
        .inspect_err(|_| warn_ignored(field, raw, "integer"))
        .ok()
}

/// Reads a boolean field with the same tolerance as [`int_field`].
#[must_use]
pub fn bool_field(record: &RawRecord, field: &str) -> Option<bool> {
    let raw = record.get(field)?;
    parse_bool(raw)
        .inspect_err(|_| warn_ignored(field, raw, "boolean"))
        .ok()
}

/// Reads a temperature field. A missing field reads as unknown.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` naming `field` if the value is not a
/// temperature.
pub fn temperature_field(record: &RawRecord, field: &str) -> Result<Temperature, ParseError> {
    match record.get(field) {
        Some(raw) => parse_temperature(raw).map_err(|e| for_field(e, field)),
        None => {
            tracing::debug!(field, "Temperature field absent, reading as unknown");
            Ok(Temperature::Unknown)
        }
    }
}

/// Reads a setpoint field. A missing field reads as unknown.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` naming `field` if the value is not a
/// setpoint.
pub fn setpoint_field(record: &RawRecord, field: &str) -> Result<Setpoint, ParseError> {
    match record.get(field) {
        Some(raw) => parse_setpoint(raw).map_err(|e| for_field(e, field)),
        None => Ok(Setpoint::Unknown),
    }
}

/// Reads a field through a `FromStr`-like conversion with integer/boolean
/// tolerance: failures are logged and yield `None`.
pub fn coded_field<T, E>(
    record: &RawRecord,
    field: &str,
    convert: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T>
where
    E: std::fmt::Display,
{
    let raw = record.get(field)?;
    match convert(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(field, value = raw, error = %e, "Ignoring unparsable field");
            None
        }
    }
}

/// Reads a percent-encoded text field, such as the unit name.
///
/// Invalid encodings are logged and the raw text is returned unchanged.
#[must_use]
pub fn decoded_text_field(record: &RawRecord, field: &str) -> Option<String> {
    let raw = record.get(field)?;
    match urlencoding::decode(raw) {
        Ok(text) => Some(text.into_owned()),
        Err(e) => {
            tracing::warn!(field, value = raw, error = %e, "Field is not valid percent-encoding");
            Some(raw.to_string())
        }
    }
}

fn warn_ignored(field: &str, value: &str, expected: &str) {
    tracing::warn!(field, value, expected, "Ignoring unparsable field");
}

fn invalid(kind: &str, value: &str) -> ParseError {
    ParseError::InvalidValue {
        field: kind.to_string(),
        message: format!("'{value}' is not a valid {kind}"),
    }
}

fn for_field(err: ParseError, field: &str) -> ParseError {
    match err {
        ParseError::InvalidValue { message, .. } => ParseError::InvalidValue {
            field: field.to_string(),
            message,
        },
        other => other,
    }
}

// ============================================================================
// Write rules
// ============================================================================

/// How a [`FieldWriter`] treats fields without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Every field passed to the writer must have a value.
    Strict,
    /// Fields without a value are skipped.
    #[default]
    Lenient,
}

/// Formats typed values into an outgoing [`RawRecord`].
///
/// # Examples
///
/// ```
/// use daikin_lib::coercion::{FieldWriter, Strictness};
/// use daikin_lib::types::Setpoint;
///
/// let mut writer = FieldWriter::new(Strictness::Lenient);
/// writer
///     .bool("pow", Some(true))?
///     .int("mode", None)?
///     .temperature("stemp", Some(Setpoint::Celsius(24.0)))?;
/// let record = writer.finish();
///
/// assert_eq!(record.get("pow"), Some("1"));
/// assert_eq!(record.get("stemp"), Some("24.0"));
/// assert!(record.get("mode").is_none());
///
/// let mut strict = FieldWriter::new(Strictness::Strict);
/// assert!(strict.int("mode", None).is_err());
/// # Ok::<(), daikin_lib::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldWriter {
    record: RawRecord,
    strictness: Strictness,
}

impl FieldWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new(strictness: Strictness) -> Self {
        Self {
            record: RawRecord::new(),
            strictness,
        }
    }

    /// Writes an integer field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` in strict mode when `value` is `None`.
    pub fn int(&mut self, field: &str, value: Option<i64>) -> Result<&mut Self, ParseError> {
        self.put(field, value.map(format_int))
    }

    /// Writes a boolean field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` in strict mode when `value` is `None`.
    pub fn bool(&mut self, field: &str, value: Option<bool>) -> Result<&mut Self, ParseError> {
        self.put(field, value.map(format_bool))
    }

    /// Writes a temperature or humidity setpoint field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` in strict mode when `value` is `None`,
    /// and `ParseError::InvalidValue` for a NaN or infinite setpoint.
    pub fn temperature(
        &mut self,
        field: &str,
        value: Option<Setpoint>,
    ) -> Result<&mut Self, ParseError> {
        if let Some(v) = value.and_then(|s| s.value())
            && !v.is_finite()
        {
            return Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("temperature {v} is not a finite number"),
            });
        }
        self.put(field, value.map(format_temperature))
    }

    /// Writes a code string field verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` in strict mode when `value` is `None`.
    pub fn code(&mut self, field: &str, value: Option<&str>) -> Result<&mut Self, ParseError> {
        self.put(field, value.map(str::to_string))
    }

    /// Returns the formatted record.
    #[must_use]
    pub fn finish(self) -> RawRecord {
        self.record
    }

    fn put(&mut self, field: &str, value: Option<String>) -> Result<&mut Self, ParseError> {
        match (value, self.strictness) {
            (Some(v), _) => {
                self.record.insert(field, v);
            }
            (None, Strictness::Strict) => return Err(ParseError::MissingField(field.to_string())),
            (None, Strictness::Lenient) => {}
        }
        Ok(self)
    }
}
