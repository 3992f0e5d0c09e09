// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `daikin_lib` library.
//!
//! The hierarchy separates the ways a request cycle can fail:
//!
//! - [`ProtocolError`]: the network round trip itself failed (socket, HTTP, timeout)
//! - [`ParseError`]: the response could not be split into status and fields, or a
//!   field the caller depends on could not be read
//! - [`DeviceError`]: the unit answered, but with a non-`OK` status token
//! - [`ValueError`]: a value supplied by the caller is not representable on the wire
//!
//! Non-critical field coercion problems are not errors: they are logged through
//! `tracing` and the affected field is left unset.

use std::fmt;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during network communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device answered with a failure status.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// Returns `true` if the failure happened on the network and the whole
    /// request may be retried unchanged.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns `true` if the device rejected the request parameters.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Device(DeviceError::Rejected { .. }))
    }
}

/// Errors related to values supplied by the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A temperature must be a finite number.
    #[error("temperature {0} is not a finite number")]
    NonFiniteTemperature(f64),

    /// The operation mode code is not one the unit understands.
    #[error("unknown operation mode: {0}")]
    InvalidMode(String),

    /// The fan rate code is not one the unit understands.
    #[error("unknown fan rate: {0}")]
    InvalidFanRate(String),

    /// The fan direction code is not one the unit understands.
    #[error("unknown fan direction: {0}")]
    InvalidFanDirection(String),

    /// A textual control command could not be interpreted.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Errors related to network communication (UDP/HTTP).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket operation failed.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The device answered with a non-success HTTP status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The response cannot be split into a status token and fields.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// A field required by the operation is missing.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Why a device refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// `ret=PARAM NG`.
    BadParameters,
    /// `ret=ADV_NG`.
    AdvancedFeatureRejected,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadParameters => f.write_str("bad parameters"),
            Self::AdvancedFeatureRejected => f.write_str("advanced feature rejected"),
        }
    }
}

/// Errors reported by the device through its status token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device refused the request; it may succeed with corrected parameters.
    #[error("request rejected: {reason}")]
    Rejected {
        /// The reason given by the device.
        reason: RejectReason,
    },

    /// The status token is not one this library knows, which usually means a
    /// firmware speaking a different protocol version.
    #[error("unrecognized status: {raw}")]
    UnknownStatus {
        /// The status token as received.
        raw: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
