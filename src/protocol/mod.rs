// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transports for talking to Daikin units.
//!
//! [`Protocol`] is the seam between the device abstraction and the network:
//! it carries one [`Request`] to a unit and hands back the unparsed
//! [`Response`]. Status validation and field coercion happen above it, in
//! [`Aircon`](crate::Aircon).
//!
//! - [`HttpClient`]: the HTTP transport used by real units

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpClientBuilder, HttpConfig};

use crate::command::Request;
use crate::error::{Error, ProtocolError};
use crate::wire::{RawRecord, parse_response};

/// Unparsed answer of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    body: Vec<u8>,
}

impl Response {
    /// Creates a response with the given body.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decodes and validates the body.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` for malformed bodies and a `DeviceError` for
    /// non-`OK` status tokens.
    pub fn parse(&self) -> Result<RawRecord, Error> {
        parse_response(&self.body)
    }
}

/// Trait for transports that can carry requests to a unit.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Sends a request and returns the unit's answer.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be delivered or no
    /// answer arrives in time.
    async fn send(&self, request: &Request) -> Result<Response, ProtocolError>;

    /// Returns a description of the remote unit, used in log events.
    fn target(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parse_validates_status() {
        let ok = Response::new("ret=OK,pow=1");
        assert_eq!(ok.parse().unwrap().get("pow"), Some("1"));

        let rejected = Response::new(b"ret=PARAM NG".to_vec());
        assert!(rejected.parse().unwrap_err().is_rejected());
    }
}
