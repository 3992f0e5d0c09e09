// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Current control settings (`/aircon/get_control_info`).

use serde::Serialize;

use crate::coercion::{bool_field, coded_field, int_field, setpoint_field};
use crate::command::ControlUpdate;
use crate::error::ParseError;
use crate::types::{FanDirection, FanRate, Mode, Setpoint};
use crate::wire::RawRecord;

/// Typed view of a control info response.
///
/// # Examples
///
/// ```
/// use daikin_lib::response::ControlInfo;
/// use daikin_lib::types::{FanRate, Mode, Setpoint};
/// use daikin_lib::wire::parse_response;
///
/// let record = parse_response(
///     b"ret=OK,pow=1,mode=3,stemp=22.0,shum=0,f_rate=A,f_dir=0,alert=255,b_mode=3,b_shum=0",
/// )
/// .unwrap();
/// let info = ControlInfo::from_record(record).unwrap();
///
/// assert_eq!(info.power, Some(true));
/// assert_eq!(info.mode, Some(Mode::Cool));
/// assert_eq!(info.target_temperature, Setpoint::Celsius(22.0));
/// assert_eq!(info.fan_rate, Some(FanRate::Auto));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlInfo {
    /// Power state (`pow`).
    pub power: Option<bool>,
    /// Operation mode (`mode`).
    pub mode: Option<Mode>,
    /// Target temperature (`stemp`).
    pub target_temperature: Setpoint,
    /// Target humidity (`shum`).
    pub target_humidity: Setpoint,
    /// Fan speed (`f_rate`).
    pub fan_rate: Option<FanRate>,
    /// Swing direction (`f_dir`).
    pub fan_direction: Option<FanDirection>,
    /// Alert code (`alert`).
    pub alert: Option<i64>,
    /// Mode remembered for backup operation (`b_mode`).
    pub backup_mode: Option<i64>,
    /// Humidity remembered for backup operation (`b_shum`).
    pub backup_humidity: Setpoint,
    #[serde(skip)]
    raw: RawRecord,
}

impl ControlInfo {
    /// Builds the typed view from a validated record.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if a setpoint field holds something
    /// other than a number, `M`, or an unknown sentinel.
    pub fn from_record(record: RawRecord) -> Result<Self, ParseError> {
        Ok(Self {
            power: bool_field(&record, "pow"),
            mode: coded_field(&record, "mode", str::parse::<Mode>),
            target_temperature: setpoint_field(&record, "stemp")?,
            target_humidity: setpoint_field(&record, "shum")?,
            fan_rate: coded_field(&record, "f_rate", str::parse::<FanRate>),
            fan_direction: coded_field(&record, "f_dir", str::parse::<FanDirection>),
            alert: int_field(&record, "alert"),
            backup_mode: int_field(&record, "b_mode"),
            backup_humidity: setpoint_field(&record, "b_shum")?,
            raw: record,
        })
    }

    /// Returns the record this view was built from.
    #[must_use]
    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }

    /// Returns the mutable part of these settings as an update.
    ///
    /// Fields that could not be read are left unset in the update; writing
    /// it with [`Strictness::Strict`](crate::coercion::Strictness::Strict)
    /// formatting therefore fails instead of sending an incomplete state.
    #[must_use]
    pub fn to_update(&self) -> ControlUpdate {
        let known = |s: Setpoint| (s != Setpoint::Unknown).then_some(s);

        ControlUpdate {
            power: self.power,
            mode: self.mode,
            target_temperature: known(self.target_temperature),
            target_humidity: known(self.target_humidity),
            fan_rate: self.fan_rate,
            fan_direction: self.fan_direction,
        }
    }
}

impl TryFrom<RawRecord> for ControlInfo {
    type Error = ParseError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_response;

    #[test]
    fn dry_mode_reports_manual_setpoint() {
        let record = parse_response(b"ret=OK,pow=1,mode=2,stemp=M,shum=50,f_rate=B,f_dir=3").unwrap();
        let info = ControlInfo::from_record(record).unwrap();
        assert_eq!(info.mode, Some(Mode::Dry));
        assert_eq!(info.target_temperature, Setpoint::Manual);
        assert_eq!(info.target_humidity, Setpoint::Celsius(50.0));
        assert_eq!(info.fan_rate, Some(FanRate::Silent));
        assert_eq!(info.fan_direction, Some(FanDirection::ThreeD));
        assert_eq!(info.backup_humidity, Setpoint::Unknown);
    }

    #[test]
    fn unknown_mode_and_fan_codes_are_unset() {
        let record = parse_response(b"ret=OK,pow=0,mode=5,stemp=--,shum=--,f_rate=Z,f_dir=9,alert=x").unwrap();
        let info = ControlInfo::from_record(record).unwrap();
        assert_eq!(info.power, Some(false));
        assert_eq!(info.mode, None);
        assert_eq!(info.fan_rate, None);
        assert_eq!(info.fan_direction, None);
        assert_eq!(info.alert, None);
        assert_eq!(info.target_temperature, Setpoint::Unknown);
    }

    #[test]
    fn garbage_setpoint_fails_the_read() {
        let record = parse_response(b"ret=OK,pow=1,mode=3,stemp=warm").unwrap();
        assert!(ControlInfo::try_from(record).is_err());
    }

    #[test]
    fn to_update_drops_unknown_setpoints() {
        let record = parse_response(b"ret=OK,pow=1,mode=6,stemp=--,shum=--,f_rate=5,f_dir=0").unwrap();
        let update = ControlInfo::from_record(record).unwrap().to_update();
        assert_eq!(update.power, Some(true));
        assert_eq!(update.mode, Some(Mode::Fan));
        assert_eq!(update.target_temperature, None);
        assert_eq!(update.fan_rate, Some(FanRate::Level3));
    }
}
