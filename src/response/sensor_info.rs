// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor telemetry (`/aircon/get_sensor_info`).

use serde::Serialize;

use crate::coercion::{int_field, temperature_field};
use crate::error::ParseError;
use crate::types::Temperature;
use crate::wire::RawRecord;

/// Typed view of a sensor info response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorInfo {
    /// Indoor temperature (`htemp`).
    pub indoor_temperature: Temperature,
    /// Indoor relative humidity (`hhum`).
    pub indoor_humidity: Temperature,
    /// Outdoor temperature (`otemp`).
    pub outdoor_temperature: Temperature,
    /// Sensor error code (`err`).
    pub error_code: Option<i64>,
    #[serde(skip)]
    raw: RawRecord,
}

impl SensorInfo {
    /// Builds the typed view from a validated record.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if a temperature field holds
    /// something other than a number or an unknown sentinel.
    pub fn from_record(record: RawRecord) -> Result<Self, ParseError> {
        Ok(Self {
            indoor_temperature: temperature_field(&record, "htemp")?,
            indoor_humidity: temperature_field(&record, "hhum")?,
            outdoor_temperature: temperature_field(&record, "otemp")?,
            error_code: int_field(&record, "err"),
            raw: record,
        })
    }

    /// Returns the record this view was built from.
    #[must_use]
    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }
}

impl TryFrom<RawRecord> for SensorInfo {
    type Error = ParseError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}
