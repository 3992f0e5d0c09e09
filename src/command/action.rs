// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Textual control commands, as issued from menus and shell callbacks.

use std::fmt;

use crate::command::ControlUpdate;
use crate::device::Aircon;
use crate::error::{Error, ValueError};
use crate::protocol::Protocol;
use crate::types::{FanDirection, FanRate, Mode, Setpoint};

/// A single-setting change expressed as `<name> <argument>`.
///
/// # Examples
///
/// ```
/// use daikin_lib::command::ControlCommand;
/// use daikin_lib::types::{FanRate, Setpoint};
///
/// let cmd = ControlCommand::parse("set_target_temp", "22.5").unwrap();
/// assert_eq!(cmd, ControlCommand::SetTargetTemperature(Setpoint::Celsius(22.5)));
///
/// let cmd = ControlCommand::parse("set_frate", "A").unwrap();
/// assert_eq!(cmd, ControlCommand::SetFanRate(FanRate::Auto));
/// assert_eq!(cmd.to_string(), "set_frate A");
///
/// assert!(ControlCommand::parse("set_color", "red").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    /// `set_power <0|1>`; any argument other than `0` turns the unit on.
    SetPower(bool),
    /// `set_mode <code|name>`.
    SetMode(Mode),
    /// `set_target_temp <degrees>`.
    SetTargetTemperature(Setpoint),
    /// `set_frate <code>`.
    SetFanRate(FanRate),
    /// `set_fdir <code>`.
    SetFanDirection(FanDirection),
}

impl ControlCommand {
    /// Parses a command name and its argument.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownCommand` for an unknown name, or the
    /// relevant `ValueError` if the argument is invalid for the command.
    pub fn parse(name: &str, arg: &str) -> Result<Self, ValueError> {
        let arg = arg.trim();
        match name {
            "set_power" => Ok(Self::SetPower(arg != "0")),
            "set_mode" => arg.parse().map(Self::SetMode),
            "set_target_temp" => {
                let value = arg
                    .parse::<f64>()
                    .map_err(|_| ValueError::UnknownCommand(format!("{name} {arg}")))?;
                Setpoint::celsius(value).map(Self::SetTargetTemperature)
            }
            "set_frate" => arg.parse().map(Self::SetFanRate),
            "set_fdir" => arg.parse().map(Self::SetFanDirection),
            other => Err(ValueError::UnknownCommand(other.to_string())),
        }
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetPower(_) => "set_power",
            Self::SetMode(_) => "set_mode",
            Self::SetTargetTemperature(_) => "set_target_temp",
            Self::SetFanRate(_) => "set_frate",
            Self::SetFanDirection(_) => "set_fdir",
        }
    }

    /// Returns the argument in the form [`Self::parse`] accepts.
    #[must_use]
    pub fn argument(&self) -> String {
        match self {
            Self::SetPower(on) => if *on { "1" } else { "0" }.to_string(),
            Self::SetMode(mode) => mode.code().to_string(),
            Self::SetTargetTemperature(target) => target.wire_value(),
            Self::SetFanRate(rate) => rate.code().to_string(),
            Self::SetFanDirection(dir) => dir.code().to_string(),
        }
    }

    /// Returns the equivalent partial update.
    #[must_use]
    pub fn to_update(&self) -> ControlUpdate {
        let update = ControlUpdate::new();
        match *self {
            Self::SetPower(on) => update.with_power(on),
            Self::SetMode(mode) => update.with_mode(mode),
            Self::SetTargetTemperature(target) => update.with_target_temperature(target),
            Self::SetFanRate(rate) => update.with_fan_rate(rate),
            Self::SetFanDirection(dir) => update.with_fan_direction(dir),
        }
    }

    /// Applies the command to a unit with a merged write.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Aircon::set_control_info`].
    pub async fn apply<P: Protocol>(&self, aircon: &Aircon<P>) -> Result<(), Error> {
        tracing::info!(command = %self, "Applying control command");
        aircon.update_control_info(&self.to_update()).await
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.argument())
    }
}
