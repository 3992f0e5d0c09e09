// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interpretation of the mandatory `ret=` status token.

use std::fmt;

use crate::error::{DeviceError, Error, ParseError, RejectReason};
use crate::wire::{RawRecord, decode};

/// Key of the status token in a decoded record.
pub const STATUS_KEY: &str = "ret";

/// Literal prefix every response starts with.
pub(crate) const STATUS_PREFIX: &str = "ret=";

/// Status token returned by a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    /// `OK`: the remaining pairs are the payload.
    Ok,
    /// `PARAM NG`: the request parameters were refused.
    ParamNg,
    /// `ADV_NG`: an advanced feature was refused.
    AdvNg,
    /// Any other token.
    Unknown(String),
}

impl ReturnCode {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::ParamNg => "PARAM NG",
            Self::AdvNg => "ADV_NG",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ReturnCode {
    fn from(s: &str) -> Self {
        match s {
            "OK" => Self::Ok,
            "PARAM NG" => Self::ParamNg,
            "ADV_NG" => Self::AdvNg,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the status token of a decoded record.
///
/// On `ret=OK` the record is returned with the status entry removed. No
/// payload is returned for any other status.
///
/// # Errors
///
/// - [`DeviceError::Rejected`] for `PARAM NG` and `ADV_NG`
/// - [`DeviceError::UnknownStatus`] for any other token
/// - [`ParseError::MissingField`] if the record carries no status at all
///
/// # Examples
///
/// ```
/// use daikin_lib::wire::{decode, validate};
///
/// let ok = validate(decode(b"ret=OK,pow=0").unwrap()).unwrap();
/// assert_eq!(ok.get("pow"), Some("0"));
///
/// let rejected = validate(decode(b"ret=PARAM NG").unwrap());
/// assert!(rejected.unwrap_err().is_rejected());
/// ```
pub fn validate(mut record: RawRecord) -> Result<RawRecord, Error> {
    let status = record
        .remove(STATUS_KEY)
        .ok_or_else(|| ParseError::MissingField(STATUS_KEY.to_string()))?;

    match ReturnCode::from(status.as_str()) {
        ReturnCode::Ok => Ok(record),
        ReturnCode::ParamNg => Err(DeviceError::Rejected {
            reason: RejectReason::BadParameters,
        }
        .into()),
        ReturnCode::AdvNg => Err(DeviceError::Rejected {
            reason: RejectReason::AdvancedFeatureRejected,
        }
        .into()),
        ReturnCode::Unknown(raw) => Err(DeviceError::UnknownStatus { raw }.into()),
    }
}

/// Decodes and validates a response body in one step.
///
/// # Errors
///
/// Returns the errors of [`decode`] and [`validate`].
pub fn parse_response(bytes: &[u8]) -> Result<RawRecord, Error> {
    validate(decode(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_yields_payload_without_status() {
        let payload = parse_response(b"ret=OK,pow=1,mode=3").unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get("pow"), Some("1"));
        assert!(!payload.contains_key(STATUS_KEY));
    }

    #[test]
    fn ok_without_payload() {
        let payload = parse_response(b"ret=OK").unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn param_ng_is_bad_parameters() {
        let err = parse_response(b"ret=PARAM NG").unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::Rejected {
                reason: RejectReason::BadParameters
            })
        ));
    }

    #[test]
    fn adv_ng_is_advanced_feature_rejected() {
        let err = parse_response(b"ret=ADV_NG,adv=").unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::Rejected {
                reason: RejectReason::AdvancedFeatureRejected
            })
        ));
    }

    #[test]
    fn other_token_is_unknown_status() {
        let err = parse_response(b"ret=SERIAL NG,pow=1").unwrap_err();
        match err {
            Error::Device(DeviceError::UnknownStatus { raw }) => assert_eq!(raw, "SERIAL NG"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn format_errors_pass_through() {
        assert!(matches!(
            parse_response(b""),
            Err(Error::Parse(ParseError::UnexpectedFormat(_)))
        ));
        assert!(matches!(
            parse_response(b"OK,pow=1"),
            Err(Error::Parse(ParseError::UnexpectedFormat(_)))
        ));
    }

    #[test]
    fn status_comes_from_first_segment_only() {
        for body in [
            &b"ret=OK,pow=1,ret=PARAM NG"[..],
            &b"ret=PARAM NG,pow=1,ret=OK"[..],
        ] {
            assert!(matches!(
                parse_response(body),
                Err(Error::Parse(ParseError::UnexpectedFormat(_)))
            ));
        }
    }

    #[test]
    fn validate_requires_status() {
        let record: RawRecord = [("pow", "1")].into_iter().collect();
        assert!(matches!(
            validate(record),
            Err(Error::Parse(ParseError::MissingField(_)))
        ));
    }

    #[test]
    fn return_code_round_trip() {
        for code in ["OK", "PARAM NG", "ADV_NG", "NG"] {
            assert_eq!(ReturnCode::from(code).as_str(), code);
        }
        assert_eq!(ReturnCode::from("ADV_NG"), ReturnCode::AdvNg);
    }
}
