// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature and setpoint values.
//!
//! Units report readings as decimal text, but use sentinel literals when a
//! sensor has no value: `-` and `--` mean "unknown", and setpoint fields use
//! `M` while the unit regulates on its own (dry and fan modes). Humidity
//! fields share the same encoding and therefore the same types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A sensor reading: either a finite value or unknown.
///
/// # Examples
///
/// ```
/// use daikin_lib::types::Temperature;
///
/// let t = Temperature::celsius(21.5).unwrap();
/// assert_eq!(t.value(), Some(21.5));
/// assert_eq!(t.to_string(), "21.5");
///
/// assert_eq!(Temperature::Unknown.value(), None);
/// assert!(Temperature::celsius(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    /// A finite reading.
    Celsius(f64),
    /// The unit reported `-` or `--`, or did not report the field.
    Unknown,
}

impl Temperature {
    /// Creates a reading from a value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NonFiniteTemperature` for NaN or infinite values.
    pub fn celsius(value: f64) -> Result<Self, ValueError> {
        if value.is_finite() {
            Ok(Self::Celsius(value))
        } else {
            Err(ValueError::NonFiniteTemperature(value))
        }
    }

    /// Returns the value, if known.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Celsius(v) => Some(*v),
            Self::Unknown => None,
        }
    }

    /// Returns `true` if no value is available.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str("-"),
        }
    }
}

/// A target value on the control endpoint.
///
/// Besides the unknown sentinels, a setpoint may be `M`: the unit is not
/// regulating toward a fixed value.
///
/// # Examples
///
/// ```
/// use daikin_lib::types::Setpoint;
///
/// let target = Setpoint::celsius(24.0).unwrap();
/// assert_eq!(target.wire_value(), "24.0");
/// assert_eq!(Setpoint::Manual.wire_value(), "M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setpoint {
    /// A finite target.
    Celsius(f64),
    /// The unit reported no target.
    Unknown,
    /// The unit regulates without a fixed target.
    Manual,
}

impl Setpoint {
    /// Wire literal for [`Setpoint::Manual`].
    pub const MANUAL_LITERAL: &'static str = "M";

    /// Creates a setpoint from a value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NonFiniteTemperature` for NaN or infinite values.
    pub fn celsius(value: f64) -> Result<Self, ValueError> {
        Temperature::celsius(value).map(Self::from)
    }

    /// Returns the value, if the setpoint is numeric.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Celsius(v) => Some(*v),
            Self::Unknown | Self::Manual => None,
        }
    }

    /// Returns the text sent to the unit for this setpoint.
    ///
    /// Numeric values are written in their shortest exact form, with a
    /// trailing `.0` for whole numbers.
    #[must_use]
    pub fn wire_value(&self) -> String {
        match self {
            Self::Celsius(v) if v.fract() == 0.0 => format!("{v:.1}"),
            Self::Celsius(v) => format!("{v}"),
            Self::Unknown => "--".to_string(),
            Self::Manual => Self::MANUAL_LITERAL.to_string(),
        }
    }
}

impl From<Temperature> for Setpoint {
    fn from(t: Temperature) -> Self {
        match t {
            Temperature::Celsius(v) => Self::Celsius(v),
            Temperature::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str("-"),
            Self::Manual => f.write_str(Self::MANUAL_LITERAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite() {
        assert!(Temperature::celsius(f64::INFINITY).is_err());
        assert!(Setpoint::celsius(f64::NEG_INFINITY).is_err());
        assert!(Temperature::celsius(-12.0).is_ok());
    }

    #[test]
    fn setpoint_wire_value() {
        assert_eq!(Setpoint::Celsius(24.0).wire_value(), "24.0");
        assert_eq!(Setpoint::Celsius(21.5).wire_value(), "21.5");
        assert_eq!(Setpoint::Celsius(21.25).wire_value(), "21.25");
        assert_eq!(Setpoint::Celsius(-3.0).wire_value(), "-3.0");
        assert_eq!(Setpoint::Unknown.wire_value(), "--");
    }

    #[test]
    fn setpoint_from_temperature() {
        assert_eq!(
            Setpoint::from(Temperature::Celsius(18.0)),
            Setpoint::Celsius(18.0)
        );
        assert_eq!(Setpoint::from(Temperature::Unknown), Setpoint::Unknown);
    }

    #[test]
    fn display() {
        assert_eq!(Temperature::Celsius(23.0).to_string(), "23");
        assert_eq!(Temperature::Unknown.to_string(), "-");
        assert_eq!(Setpoint::Manual.to_string(), "M");
    }
}
