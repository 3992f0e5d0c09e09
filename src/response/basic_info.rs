// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity of a unit (`/common/basic_info` and UDP probe answers).

use serde::Serialize;

use crate::coercion::{bool_field, decoded_text_field, int_field};
use crate::wire::RawRecord;

/// Typed view of a basic info response.
///
/// Every field is optional: identity fields that are missing or malformed
/// are left unset instead of failing the read.
///
/// # Examples
///
/// ```
/// use daikin_lib::response::BasicInfo;
/// use daikin_lib::wire::parse_response;
///
/// let record = parse_response(
///     b"ret=OK,type=aircon,ver=1_2_51,pow=1,err=0,port=30050,name=%4b%69%74%63%68%65%6e,mac=A0B1C2D3E4F5",
/// )
/// .unwrap();
/// let info = BasicInfo::from_record(record);
///
/// assert_eq!(info.name.as_deref(), Some("Kitchen"));
/// assert_eq!(info.port, Some(30050));
/// assert_eq!(info.power, Some(true));
/// assert_eq!(info.led, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    /// Unit name, percent-decoded.
    pub name: Option<String>,
    /// MAC address as reported (hex without separators).
    pub mac: Option<String>,
    /// Firmware version as reported (for example `1_2_51`).
    pub firmware_version: Option<String>,
    /// UDP port the unit listens on.
    pub port: Option<u16>,
    /// Adapter error code.
    pub error_code: Option<i64>,
    /// Protocol version.
    pub protocol_version: Option<i64>,
    /// Power state.
    pub power: Option<bool>,
    /// Front panel LED enabled.
    pub led: Option<bool>,
    #[serde(skip)]
    raw: RawRecord,
}

impl BasicInfo {
    /// Builds the typed view from a validated record.
    #[must_use]
    pub fn from_record(record: RawRecord) -> Self {
        let port = int_field(&record, "port").and_then(|p| match u16::try_from(p) {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!(field = "port", value = p, "Port out of range, ignoring");
                None
            }
        });

        Self {
            name: decoded_text_field(&record, "name"),
            mac: record.get("mac").map(str::to_string),
            firmware_version: record.get("ver").map(str::to_string),
            port,
            error_code: int_field(&record, "err"),
            protocol_version: int_field(&record, "pv"),
            power: bool_field(&record, "pow"),
            led: bool_field(&record, "led"),
            raw: record,
        }
    }

    /// Returns the record this view was built from, including keys this
    /// library does not interpret.
    #[must_use]
    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_response;

    #[test]
    fn missing_led_is_unset() {
        let record = parse_response(b"ret=OK,name=Office,mac=001122334455,ver=3_3_1,port=30050,pow=0,err=0").unwrap();
        let info = BasicInfo::from_record(record);
        assert_eq!(info.led, None);
        assert_eq!(info.power, Some(false));
        assert_eq!(info.name.as_deref(), Some("Office"));
        assert_eq!(info.firmware_version.as_deref(), Some("3_3_1"));
    }

    #[test]
    fn malformed_identity_fields_are_unset() {
        let record = parse_response(b"ret=OK,port=70000,err=x,led=maybe,pv=2").unwrap();
        let info = BasicInfo::from_record(record);
        assert_eq!(info.port, None);
        assert_eq!(info.error_code, None);
        assert_eq!(info.led, None);
        assert_eq!(info.protocol_version, Some(2));
    }

    #[test]
    fn unknown_keys_are_kept() {
        let record = parse_response(b"ret=OK,name=Den,adp_mode=run,region=eu").unwrap();
        let info = BasicInfo::from_record(record);
        assert_eq!(info.raw().get("adp_mode"), Some("run"));
        assert_eq!(info.raw().get("region"), Some("eu"));
    }

    #[test]
    fn serializes_typed_fields_only() {
        let record = parse_response(b"ret=OK,name=Den,led=1").unwrap();
        let json = serde_json::to_value(BasicInfo::from_record(record)).unwrap();
        assert_eq!(json["name"], "Den");
        assert_eq!(json["led"], true);
        assert!(json.get("raw").is_none());
    }
}
