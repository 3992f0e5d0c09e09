// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for Daikin units.

use std::time::Duration;

use reqwest::Client;

use crate::command::Request;
use crate::error::ProtocolError;
use crate::protocol::{Protocol, Response};

// ============================================================================
// HttpConfig - Connection parameters for one unit
// ============================================================================

/// Configuration for reaching a unit over HTTP.
///
/// Units speak plain, unauthenticated HTTP. Their firmware can stall on
/// malformed requests, so every request carries a timeout.
///
/// # Examples
///
/// ```
/// use daikin_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.20")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(3));
///
/// assert_eq!(config.base_url(), "http://192.168.1.20:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the unit
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a copy of this configuration addressed to another host.
    #[must_use]
    pub fn for_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self.clone()
        }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        HttpClient::with_base_url(self.base_url(), self.timeout)
    }
}

// ============================================================================
// HttpClient - Transport implementation
// ============================================================================

/// HTTP client bound to one unit.
///
/// The underlying connection pool is reused across requests; cloning the
/// client shares it.
///
/// # Examples
///
/// ```no_run
/// use daikin_lib::command::{Endpoint, Request};
/// use daikin_lib::protocol::{HttpClient, Protocol};
///
/// # async fn example() -> daikin_lib::Result<()> {
/// let client = HttpClient::new("192.168.1.20")?;
/// let response = client.send(&Request::new(Endpoint::BasicInfo)).await?;
/// let record = response.parse()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default settings.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the unit, optionally with an
    ///   `http://` scheme and port
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpClientBuilder::new().host(host).build()
    }

    fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    /// Returns the base URL of the unit.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a request.
    fn build_url(&self, request: &Request) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }

    fn map_error(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            ProtocolError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ProtocolError::Http(err)
        }
    }
}

impl Protocol for HttpClient {
    async fn send(&self, request: &Request) -> Result<Response, ProtocolError> {
        let url = self.build_url(request);

        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(body = %String::from_utf8_lossy(&body), "Received HTTP response");

        Ok(Response::new(body.to_vec()))
    }

    fn target(&self) -> &str {
        &self.base_url
    }
}

/// Builder for creating an HTTP client with custom configuration.
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    host: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClientBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host address.
    ///
    /// A full base URL such as `http://127.0.0.1:8080` is accepted as well.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if host is not set or client creation fails.
    pub fn build(self) -> Result<HttpClient, ProtocolError> {
        let host = self
            .host
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ProtocolError::InvalidAddress("host is required".to_string()))?;

        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{host}")
        };

        HttpClient::with_base_url(
            base_url,
            self.timeout.unwrap_or(HttpConfig::DEFAULT_TIMEOUT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Endpoint;
    use crate::wire::RawRecord;

    #[test]
    fn build_url_without_query() {
        let client = HttpClient::new("192.168.1.20").unwrap();
        let url = client.build_url(&Request::new(Endpoint::BasicInfo));
        assert_eq!(url, "http://192.168.1.20/common/basic_info");
    }

    #[test]
    fn build_url_with_query() {
        let client = HttpClient::new("192.168.1.20").unwrap();
        let query: RawRecord = [("pow", "1"), ("stemp", "24.0")].into_iter().collect();
        let url = client.build_url(&Request::with_query(Endpoint::SetControlInfo, query));
        assert_eq!(
            url,
            "http://192.168.1.20/aircon/set_control_info?pow=1&stemp=24.0"
        );
    }

    #[test]
    fn builder_accepts_full_base_url() {
        let client = HttpClientBuilder::new()
            .host("http://127.0.0.1:8080/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
        assert_eq!(client.target(), "http://127.0.0.1:8080");
    }

    #[test]
    fn builder_missing_host() {
        assert!(matches!(
            HttpClientBuilder::new().build(),
            Err(ProtocolError::InvalidAddress(_))
        ));
        assert!(HttpClientBuilder::new().host("  ").build().is_err());
    }

    #[test]
    fn builder_with_timeout() {
        let client = HttpClientBuilder::new()
            .host("192.168.1.20")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        assert_eq!(client.timeout, Duration::from_millis(500));
    }

    // =========================================================================
    // HttpConfig tests
    // =========================================================================

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::new("192.168.1.20");
        assert_eq!(config.host(), "192.168.1.20");
        assert_eq!(config.port(), 80);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.base_url(), "http://192.168.1.20");
    }

    #[test]
    fn http_config_custom_port() {
        let config = HttpConfig::new("192.168.1.20").with_port(8080);
        assert_eq!(config.base_url(), "http://192.168.1.20:8080");
    }

    #[test]
    fn http_config_for_host_keeps_settings() {
        let template = HttpConfig::new("unused")
            .with_port(8080)
            .with_timeout(Duration::from_secs(2));
        let config = template.for_host("10.0.0.7");
        assert_eq!(config.host(), "10.0.0.7");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn http_config_into_client() {
        let client = HttpConfig::new("10.0.0.7")
            .with_timeout(Duration::from_secs(3))
            .into_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.7");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }
}
