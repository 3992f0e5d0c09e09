// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operation mode of an air conditioning unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operation mode, carried on the wire as the integer `mode` field.
///
/// Units in automatic mode may report the direction they are currently
/// working in (`1` and `7`); both are accepted on writes as well.
///
/// # Examples
///
/// ```
/// use daikin_lib::types::Mode;
///
/// assert_eq!(Mode::Cool.code(), 3);
/// assert_eq!(Mode::try_from(4).unwrap(), Mode::Heat);
/// assert_eq!("fan".parse::<Mode>().unwrap(), Mode::Fan);
/// assert_eq!("6".parse::<Mode>().unwrap(), Mode::Fan);
/// assert!(Mode::try_from(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Automatic (`0`).
    Auto,
    /// Automatic, currently cooling (`1`).
    AutoCooling,
    /// Dehumidify (`2`).
    Dry,
    /// Cooling (`3`).
    Cool,
    /// Heating (`4`).
    Heat,
    /// Ventilation only (`6`).
    Fan,
    /// Automatic, currently heating (`7`).
    AutoHeating,
}

impl Mode {
    /// The modes a user selects directly, in menu order.
    pub const SELECTABLE: [Self; 5] = [Self::Auto, Self::Cool, Self::Heat, Self::Fan, Self::Dry];

    /// Returns the wire code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::AutoCooling => 1,
            Self::Dry => 2,
            Self::Cool => 3,
            Self::Heat => 4,
            Self::Fan => 6,
            Self::AutoHeating => 7,
        }
    }

    /// Returns the short command name (`auto`, `cool`, ...).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto | Self::AutoCooling | Self::AutoHeating => "auto",
            Self::Dry => "dry",
            Self::Cool => "cool",
            Self::Heat => "heat",
            Self::Fan => "fan",
        }
    }

    /// Returns a human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::AutoCooling => "Auto - cooling",
            Self::Dry => "Drying",
            Self::Cool => "Cooling",
            Self::Heat => "Heating",
            Self::Fan => "Ventilating",
            Self::AutoHeating => "Auto - heating",
        }
    }

    /// Returns `true` for the automatic variants.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto | Self::AutoCooling | Self::AutoHeating)
    }
}

impl TryFrom<i64> for Mode {
    type Error = ValueError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Auto),
            1 => Ok(Self::AutoCooling),
            2 => Ok(Self::Dry),
            3 => Ok(Self::Cool),
            4 => Ok(Self::Heat),
            6 => Ok(Self::Fan),
            7 => Ok(Self::AutoHeating),
            other => Err(ValueError::InvalidMode(other.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Self::try_from(code);
        }
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "dry" => Ok(Self::Dry),
            "cool" => Ok(Self::Cool),
            "heat" => Ok(Self::Heat),
            "fan" => Ok(Self::Fan),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for mode in [
            Mode::Auto,
            Mode::AutoCooling,
            Mode::Dry,
            Mode::Cool,
            Mode::Heat,
            Mode::Fan,
            Mode::AutoHeating,
        ] {
            assert_eq!(Mode::try_from(i64::from(mode.code())).unwrap(), mode);
        }
    }

    #[test]
    fn unknown_codes_rejected() {
        assert_eq!(
            Mode::try_from(5),
            Err(ValueError::InvalidMode("5".to_string()))
        );
        assert!(Mode::try_from(-1).is_err());
        assert!("turbo".parse::<Mode>().is_err());
    }

    #[test]
    fn auto_variants() {
        assert!(Mode::AutoHeating.is_auto());
        assert!(!Mode::Cool.is_auto());
        assert_eq!(Mode::AutoCooling.as_str(), "auto");
        assert_eq!(Mode::AutoCooling.label(), "Auto - cooling");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("COOL".parse::<Mode>().unwrap(), Mode::Cool);
        assert_eq!(" heat ".parse::<Mode>().unwrap(), Mode::Heat);
    }
}
