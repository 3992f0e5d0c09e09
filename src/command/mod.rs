// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requests understood by Daikin units.
//!
//! Every request is an HTTP `GET` against one of a handful of fixed paths;
//! writes carry their fields in the query string.
//!
//! | Endpoint | Path | Purpose |
//! |----------|------|---------|
//! | [`Endpoint::BasicInfo`] | `/common/basic_info` | identity |
//! | [`Endpoint::Reboot`] | `/common/reboot` | reboot the adapter |
//! | [`Endpoint::SensorInfo`] | `/aircon/get_sensor_info` | telemetry |
//! | [`Endpoint::ControlInfo`] | `/aircon/get_control_info` | current settings |
//! | [`Endpoint::SetControlInfo`] | `/aircon/set_control_info` | write settings |
//!
//! # Examples
//!
//! ```
//! use daikin_lib::command::{ControlUpdate, Endpoint, Request};
//! use daikin_lib::types::Setpoint;
//!
//! let query = ControlUpdate::new()
//!     .with_power(true)
//!     .with_target_temperature(Setpoint::Celsius(24.0))
//!     .to_record()
//!     .unwrap();
//! let request = Request::with_query(Endpoint::SetControlInfo, query);
//!
//! assert_eq!(request.path_and_query(), "/aircon/set_control_info?pow=1&stemp=24.0");
//! ```

mod action;
mod control;

pub use action::ControlCommand;
pub use control::{ControlUpdate, MUTABLE_FIELDS, MergePolicy, merge_control_fields};

use std::fmt;

use crate::wire::{RawRecord, encode_query};

/// A fixed HTTP endpoint on the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Identity of the unit.
    BasicInfo,
    /// Reboot the network adapter.
    Reboot,
    /// Sensor telemetry.
    SensorInfo,
    /// Current control settings.
    ControlInfo,
    /// Write control settings.
    SetControlInfo,
}

impl Endpoint {
    /// Returns the request path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::BasicInfo => "/common/basic_info",
            Self::Reboot => "/common/reboot",
            Self::SensorInfo => "/aircon/get_sensor_info",
            Self::ControlInfo => "/aircon/get_control_info",
            Self::SetControlInfo => "/aircon/set_control_info",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A request to send to a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    endpoint: Endpoint,
    query: RawRecord,
}

impl Request {
    /// Creates a request without query parameters.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: RawRecord::new(),
        }
    }

    /// Creates a request carrying `query` as its query string.
    #[must_use]
    pub fn with_query(endpoint: Endpoint, query: RawRecord) -> Self {
        Self { endpoint, query }
    }

    /// Returns the endpoint.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Returns the query fields.
    #[must_use]
    pub fn query(&self) -> &RawRecord {
        &self.query
    }

    /// Returns the path with the encoded query string appended, if any.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.endpoint.path().to_string()
        } else {
            format!("{}?{}", self.endpoint.path(), encode_query(&self.query))
        }
    }
}

impl From<Endpoint> for Request {
    fn from(endpoint: Endpoint) -> Self {
        Self::new(endpoint)
    }
}
