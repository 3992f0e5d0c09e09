// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control writes and the read-modify-write merge.
//!
//! Units substitute defaults for every mutable field missing from a write,
//! and reject writes carrying read-only fields. Changing one setting
//! therefore means re-sending the current value of every other mutable
//! field: [`merge_control_fields`] restricts the current state to
//! [`MUTABLE_FIELDS`] and overlays the caller's changes on top.

use crate::coercion::{FieldWriter, Strictness};
use crate::error::ParseError;
use crate::types::{FanDirection, FanRate, Mode, Setpoint};
use crate::wire::RawRecord;

/// Fields a unit requires on every control write.
pub const MUTABLE_FIELDS: [&str; 6] = ["pow", "mode", "stemp", "shum", "f_rate", "f_dir"];

/// Whether a control write starts from the unit's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Read the current settings first and overlay the update on them.
    #[default]
    Merge,
    /// Send the update as-is; the caller is responsible for completeness.
    Verbatim,
}

/// A partial change to the control settings.
///
/// Unset fields are left as they are when written with
/// [`MergePolicy::Merge`].
///
/// # Examples
///
/// ```
/// use daikin_lib::command::ControlUpdate;
/// use daikin_lib::types::{FanRate, Mode};
///
/// let update = ControlUpdate::new()
///     .with_mode(Mode::Heat)
///     .with_fan_rate(FanRate::Silent);
/// let record = update.to_record().unwrap();
///
/// assert_eq!(record.get("mode"), Some("4"));
/// assert_eq!(record.get("f_rate"), Some("B"));
/// assert!(record.get("pow").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlUpdate {
    /// Power state.
    pub power: Option<bool>,
    /// Operation mode.
    pub mode: Option<Mode>,
    /// Target temperature.
    pub target_temperature: Option<Setpoint>,
    /// Target humidity.
    pub target_humidity: Option<Setpoint>,
    /// Fan speed.
    pub fan_rate: Option<FanRate>,
    /// Swing direction.
    pub fan_direction: Option<FanDirection>,
}

impl ControlUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the power state.
    #[must_use]
    pub fn with_power(mut self, on: bool) -> Self {
        self.power = Some(on);
        self
    }

    /// Sets the operation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the target temperature.
    #[must_use]
    pub fn with_target_temperature(mut self, target: Setpoint) -> Self {
        self.target_temperature = Some(target);
        self
    }

    /// Sets the target humidity.
    #[must_use]
    pub fn with_target_humidity(mut self, target: Setpoint) -> Self {
        self.target_humidity = Some(target);
        self
    }

    /// Sets the fan speed.
    #[must_use]
    pub fn with_fan_rate(mut self, rate: FanRate) -> Self {
        self.fan_rate = Some(rate);
        self
    }

    /// Sets the swing direction.
    #[must_use]
    pub fn with_fan_direction(mut self, direction: FanDirection) -> Self {
        self.fan_direction = Some(direction);
        self
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Formats the set fields, skipping unset ones.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for a NaN or infinite setpoint.
    pub fn to_record(&self) -> Result<RawRecord, ParseError> {
        self.format(Strictness::Lenient)
    }

    /// Formats the update for the wire.
    ///
    /// # Errors
    ///
    /// With [`Strictness::Strict`], returns `ParseError::MissingField` for the
    /// first unset field. Returns `ParseError::InvalidValue` for a NaN or
    /// infinite setpoint.
    pub fn format(&self, strictness: Strictness) -> Result<RawRecord, ParseError> {
        let mut writer = FieldWriter::new(strictness);
        writer
            .bool("pow", self.power)?
            .int("mode", self.mode.map(|m| i64::from(m.code())))?
            .temperature("stemp", self.target_temperature)?
            .temperature("shum", self.target_humidity)?
            .code("f_rate", self.fan_rate.as_ref().map(FanRate::code))?
            .code("f_dir", self.fan_direction.as_ref().map(FanDirection::code))?;
        Ok(writer.finish())
    }
}

/// Builds the record for a merged control write.
///
/// `current` is the raw control state as read from the unit. It is reduced
/// to [`MUTABLE_FIELDS`] and `update` is overlaid on the result, so the
/// caller's keys win.
///
/// # Examples
///
/// ```
/// use daikin_lib::command::merge_control_fields;
/// use daikin_lib::wire::RawRecord;
///
/// let current: RawRecord = [
///     ("pow", "1"), ("mode", "3"), ("stemp", "22.0"), ("shum", "0"),
///     ("f_rate", "A"), ("f_dir", "0"), ("alert", "255"),
/// ]
/// .into_iter()
/// .collect();
/// let update: RawRecord = [("stemp", "24.0")].into_iter().collect();
///
/// let merged = merge_control_fields(&current, &update);
/// assert_eq!(merged.get("stemp"), Some("24.0"));
/// assert_eq!(merged.get("mode"), Some("3"));
/// assert!(merged.get("alert").is_none());
/// ```
#[must_use]
pub fn merge_control_fields(current: &RawRecord, update: &RawRecord) -> RawRecord {
    let mut merged = current.restrict_to(&MUTABLE_FIELDS);
    merged.overlay(update);

    let missing: Vec<&str> = MUTABLE_FIELDS
        .iter()
        .copied()
        .filter(|f| !merged.contains_key(f))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Control write lacks mutable fields, unit will use defaults");
    }

    merged
}
