// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan rate and swing direction.
//!
//! Both are carried on the wire as short code strings (`f_rate`, `f_dir`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Fan speed setting.
///
/// # Examples
///
/// ```
/// use daikin_lib::types::FanRate;
///
/// assert_eq!(FanRate::Auto.code(), "A");
/// assert_eq!(FanRate::level(1).unwrap().code(), "3");
/// assert_eq!("7".parse::<FanRate>().unwrap(), FanRate::Level5);
/// assert_eq!("silent".parse::<FanRate>().unwrap(), FanRate::Silent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanRate {
    /// Unit chooses the speed (`A`).
    Auto,
    /// Quiet operation (`B`).
    Silent,
    /// Lowest speed (`3`).
    Level1,
    /// `4`.
    Level2,
    /// `5`.
    Level3,
    /// `6`.
    Level4,
    /// Highest speed (`7`).
    Level5,
}

impl FanRate {
    /// All rates in menu order.
    pub const ALL: [Self; 7] = [
        Self::Auto,
        Self::Silent,
        Self::Level1,
        Self::Level2,
        Self::Level3,
        Self::Level4,
        Self::Level5,
    ];

    /// Returns the speed level `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidFanRate` for levels outside `1..=5`.
    pub fn level(level: u8) -> Result<Self, ValueError> {
        match level {
            1 => Ok(Self::Level1),
            2 => Ok(Self::Level2),
            3 => Ok(Self::Level3),
            4 => Ok(Self::Level4),
            5 => Ok(Self::Level5),
            other => Err(ValueError::InvalidFanRate(format!("level {other}"))),
        }
    }

    /// Returns the wire code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Auto => "A",
            Self::Silent => "B",
            Self::Level1 => "3",
            Self::Level2 => "4",
            Self::Level3 => "5",
            Self::Level4 => "6",
            Self::Level5 => "7",
        }
    }

    /// Returns a short label (`auto`, `silent`, `1`..`5`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Silent => "silent",
            Self::Level1 => "1",
            Self::Level2 => "2",
            Self::Level3 => "3",
            Self::Level4 => "4",
            Self::Level5 => "5",
        }
    }
}

impl FromStr for FanRate {
    type Err = ValueError;

    /// Parses a wire code, or the names `auto` and `silent`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rate) = Self::ALL.into_iter().find(|r| r.code() == s) {
            return Ok(rate);
        }
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "silent" => Ok(Self::Silent),
            _ => Err(ValueError::InvalidFanRate(s.to_string())),
        }
    }
}

impl fmt::Display for FanRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Louver swing direction.
///
/// # Examples
///
/// ```
/// use daikin_lib::types::FanDirection;
///
/// assert_eq!(FanDirection::ThreeD.code(), "3");
/// assert_eq!("1".parse::<FanDirection>().unwrap(), FanDirection::Vertical);
/// assert_eq!("none".parse::<FanDirection>().unwrap(), FanDirection::Stopped);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanDirection {
    /// No swing (`0`).
    Stopped,
    /// Vertical swing (`1`).
    Vertical,
    /// Horizontal swing (`2`).
    Horizontal,
    /// Vertical and horizontal swing (`3`).
    ThreeD,
}

impl FanDirection {
    /// All directions in menu order.
    pub const ALL: [Self; 4] = [
        Self::Stopped,
        Self::Vertical,
        Self::Horizontal,
        Self::ThreeD,
    ];

    /// Returns the wire code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Stopped => "0",
            Self::Vertical => "1",
            Self::Horizontal => "2",
            Self::ThreeD => "3",
        }
    }

    /// Returns a short label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "none",
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::ThreeD => "3D",
        }
    }
}

impl FromStr for FanDirection {
    type Err = ValueError;

    /// Parses a wire code or a label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.code() == s || d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValueError::InvalidFanDirection(s.to_string()))
    }
}

impl fmt::Display for FanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_rate_codes_are_unique() {
        for rate in FanRate::ALL {
            assert_eq!(rate.code().parse::<FanRate>().unwrap(), rate);
        }
    }

    #[test]
    fn fan_rate_level_bounds() {
        assert_eq!(FanRate::level(5).unwrap(), FanRate::Level5);
        assert!(FanRate::level(0).is_err());
        assert!(FanRate::level(6).is_err());
    }

    #[test]
    fn fan_rate_unknown_code() {
        assert_eq!(
            "Z".parse::<FanRate>(),
            Err(ValueError::InvalidFanRate("Z".to_string()))
        );
    }

    #[test]
    fn fan_direction_parse() {
        assert_eq!(
            "3d".parse::<FanDirection>().unwrap(),
            FanDirection::ThreeD
        );
        assert_eq!(
            "2".parse::<FanDirection>().unwrap(),
            FanDirection::Horizontal
        );
        assert!("4".parse::<FanDirection>().is_err());
    }
}
