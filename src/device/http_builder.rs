// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP aircon builder.

use std::time::Duration;

use crate::device::Aircon;
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig};
use crate::response::BasicInfo;

/// Builder for creating HTTP-based aircon clients.
///
/// This builder can be created in two ways:
/// - `Aircon::http("host")` - Simple host string
/// - `Aircon::http_config(HttpConfig::new("host").with_port(8080))` - Advanced configuration
///
/// # Examples
///
/// ```no_run
/// use daikin_lib::Aircon;
/// use std::time::Duration;
///
/// # async fn example() -> daikin_lib::Result<()> {
/// // Probes the unit and returns its identity
/// let (aircon, info) = Aircon::http("192.168.1.20")
///     .with_timeout(Duration::from_secs(3))
///     .build()
///     .await?;
///
/// // No network access until the first call
/// let aircon = Aircon::http("192.168.1.21").build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AirconBuilder {
    config: HttpConfig,
}

impl AirconBuilder {
    /// Creates a new builder with the specified HTTP configuration.
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Returns the configuration the client will be built from.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the client and reads the unit's identity.
    ///
    /// A unit that answers `basic_info` is assumed reachable for the other
    /// endpoints as well.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The HTTP client cannot be created
    /// - The unit does not answer
    /// - The unit reports a failure status
    pub async fn build(self) -> Result<(Aircon<HttpClient>, BasicInfo), Error> {
        let aircon = self.build_without_probe()?;
        let info = aircon.get_basic_info().await?;

        tracing::debug!(
            target_unit = aircon.protocol().base_url(),
            name = info.name.as_deref().unwrap_or_default(),
            mac = info.mac.as_deref().unwrap_or_default(),
            "Unit identified"
        );

        Ok((aircon, info))
    }

    /// Builds the client without contacting the unit.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_without_probe(self) -> Result<Aircon<HttpClient>, Error> {
        let client = self.config.into_client().map_err(Error::Protocol)?;
        Ok(Aircon::new(client))
    }
}
