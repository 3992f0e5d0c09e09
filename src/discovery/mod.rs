// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP broadcast discovery of Daikin units.
//!
//! Units listen on UDP port 30050 for the probe `DAIKIN_UDP/common/basic_info`
//! and answer the sender with their basic info record.
//!
//! # Discovery Mechanism
//!
//! A run walks through [`DiscoveryPhase`]s:
//!
//! 1. **Listening**: a broadcast-enabled socket is bound and a receiver task
//!    records every valid answer, keyed by sender address
//! 2. **Probing**: the probe is sent up to `probe_attempts` times,
//!    `probe_interval` apart, until `waitfor` units answered
//! 3. **Draining**: with the quota still unmet, the run keeps listening
//!    without sending until the quota is met or the timeout expires
//! 4. **Done**: the receiver is stopped and the socket closed
//!
//! A run never exceeds its timeout and returning fewer than `waitfor` units
//! is not an error.
//!
//! # Examples
//!
//! ```no_run
//! use daikin_lib::discovery::{DiscoveryOptions, discover};
//! use std::time::Duration;
//!
//! # async fn example() -> daikin_lib::Result<()> {
//! let options = DiscoveryOptions::new()
//!     .with_waitfor(2)
//!     .with_timeout(Duration::from_secs(3));
//!
//! let units = discover(&options).await?;
//! for address in units.addresses() {
//!     println!("Found unit at {address}");
//! }
//! # Ok(())
//! # }
//! ```

mod listener;

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::Error;
use crate::wire::RawRecord;
use listener::Listener;

/// Datagram that makes units announce themselves.
pub const PROBE: &str = "DAIKIN_UDP/common/basic_info";

/// UDP port units listen on for probes.
pub const DISCOVERY_PORT: u16 = 30050;

const DEFAULT_WAITFOR: usize = 4;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_PROBE_ATTEMPTS: u32 = 10;
const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(200);

// ============================================================================
// DiscoveryOptions
// ============================================================================

/// Options for a discovery run.
///
/// # Examples
///
/// ```
/// use daikin_lib::discovery::DiscoveryOptions;
/// use std::time::Duration;
///
/// let options = DiscoveryOptions::new()
///     .with_waitfor(2)
///     .with_probe_interval(Duration::from_millis(100));
///
/// assert_eq!(options.timeout(), Duration::from_secs(5));
/// assert_eq!(options.probe_address().port(), 30050);
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    listen_address: SocketAddr,
    probe_address: SocketAddr,
    waitfor: usize,
    timeout: Duration,
    probe_attempts: u32,
    probe_interval: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            probe_address: SocketAddr::from((Ipv4Addr::BROADCAST, DISCOVERY_PORT)),
            waitfor: DEFAULT_WAITFOR,
            timeout: DEFAULT_TIMEOUT,
            probe_attempts: DEFAULT_PROBE_ATTEMPTS,
            probe_interval: DEFAULT_PROBE_INTERVAL,
        }
    }
}

impl DiscoveryOptions {
    /// Creates options with default settings.
    ///
    /// Defaults: listen on any address with an ephemeral port, probe
    /// `255.255.255.255:30050`, wait for 4 units, 5 second timeout, 10 probes
    /// 200 ms apart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorter budget for interactive use: 2 second timeout, 5 probes.
    #[must_use]
    pub fn quick() -> Self {
        Self::default()
            .with_timeout(Duration::from_secs(2))
            .with_probe_attempts(5)
    }

    /// Sets the local address the socket binds to.
    #[must_use]
    pub fn with_listen_address(mut self, address: SocketAddr) -> Self {
        self.listen_address = address;
        self
    }

    /// Sets the address probes are sent to.
    #[must_use]
    pub fn with_probe_address(mut self, address: SocketAddr) -> Self {
        self.probe_address = address;
        self
    }

    /// Sets how many units to wait for before stopping early.
    #[must_use]
    pub fn with_waitfor(mut self, waitfor: usize) -> Self {
        self.waitfor = waitfor;
        self
    }

    /// Sets the wall-clock budget of the whole run.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of probes.
    #[must_use]
    pub fn with_probe_attempts(mut self, attempts: u32) -> Self {
        self.probe_attempts = attempts;
        self
    }

    /// Sets the delay between probes.
    #[must_use]
    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    /// Returns the local address the socket binds to.
    #[must_use]
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Returns the address probes are sent to.
    #[must_use]
    pub fn probe_address(&self) -> SocketAddr {
        self.probe_address
    }

    /// Returns the number of units to wait for.
    #[must_use]
    pub fn waitfor(&self) -> usize {
        self.waitfor
    }

    /// Returns the wall-clock budget.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the maximum number of probes.
    #[must_use]
    pub fn probe_attempts(&self) -> u32 {
        self.probe_attempts
    }

    /// Returns the delay between probes.
    #[must_use]
    pub fn probe_interval(&self) -> Duration {
        self.probe_interval
    }
}

// ============================================================================
// DiscoveryPhase / DiscoveryResult
// ============================================================================

/// Stage of a discovery run, reported in debug events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPhase {
    /// Options collected, nothing bound yet.
    Init,
    /// Socket bound and receiver running.
    Listening,
    /// Sending probes.
    Probing,
    /// Waiting for late answers without sending.
    Draining,
    /// Receiver stopped and socket closed.
    Done,
}

impl fmt::Display for DiscoveryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Listening => "listening",
            Self::Probing => "probing",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Units that answered a discovery run, with their basic info records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    units: HashMap<IpAddr, RawRecord>,
}

impl DiscoveryResult {
    /// Returns the number of units found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if no unit answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the unit addresses in ascending order.
    #[must_use]
    pub fn addresses(&self) -> Vec<IpAddr> {
        let mut addresses: Vec<IpAddr> = self.units.keys().copied().collect();
        addresses.sort_unstable();
        addresses
    }

    /// Returns the record a unit answered with.
    #[must_use]
    pub fn get(&self, address: &IpAddr) -> Option<&RawRecord> {
        self.units.get(address)
    }

    /// Iterates over units and their records.
    pub fn iter(&self) -> impl Iterator<Item = (&IpAddr, &RawRecord)> {
        self.units.iter()
    }

    /// Consumes the result and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> HashMap<IpAddr, RawRecord> {
        self.units
    }
}

impl From<HashMap<IpAddr, RawRecord>> for DiscoveryResult {
    fn from(units: HashMap<IpAddr, RawRecord>) -> Self {
        Self { units }
    }
}

impl IntoIterator for DiscoveryResult {
    type Item = (IpAddr, RawRecord);
    type IntoIter = std::collections::hash_map::IntoIter<IpAddr, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

// ============================================================================
// Discovery run
// ============================================================================

/// Discovers units on the local network.
///
/// # Errors
///
/// Returns `ProtocolError::Io` if the socket cannot be set up or a probe
/// cannot be sent. A run that finds fewer units than requested is not an
/// error.
pub async fn discover(options: &DiscoveryOptions) -> Result<DiscoveryResult, Error> {
    let started = Instant::now();
    let deadline = started + options.timeout;
    enter(DiscoveryPhase::Init);

    tracing::info!(
        probe_address = %options.probe_address,
        waitfor = options.waitfor,
        timeout_ms = u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
        "Starting discovery"
    );

    let mut listener = Listener::bind(options.listen_address)?;
    enter(DiscoveryPhase::Listening);
    if let Ok(local) = listener.local_addr() {
        tracing::debug!(local_address = %local, "Discovery socket bound");
    }

    // The listener is dropped on the error path, which stops the receiver.
    let quota_met = probe(&mut listener, options, deadline).await?;

    if !quota_met && Instant::now() < deadline {
        enter(DiscoveryPhase::Draining);
        listener.wait_for_quota(options.waitfor, deadline).await;
    }

    let units = listener.shutdown().await;
    enter(DiscoveryPhase::Done);

    tracing::info!(
        found = units.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Discovery completed"
    );

    Ok(DiscoveryResult::from(units))
}

/// Sends probes until the quota is met, attempts run out or the deadline
/// passes. Returns `true` if the quota was met.
async fn probe(
    listener: &mut Listener,
    options: &DiscoveryOptions,
    deadline: Instant,
) -> Result<bool, Error> {
    enter(DiscoveryPhase::Probing);

    for attempt in 1..=options.probe_attempts {
        if Instant::now() >= deadline {
            break;
        }

        listener
            .send_probe(PROBE.as_bytes(), options.probe_address)
            .await?;
        tracing::debug!(attempt, heard = listener.count(), "Sent discovery probe");

        let next = (Instant::now() + options.probe_interval).min(deadline);
        if listener.wait_for_quota(options.waitfor, next).await {
            tracing::debug!(attempt, "Discovery quota met");
            return Ok(true);
        }
    }

    Ok(false)
}

fn enter(phase: DiscoveryPhase) {
    tracing::debug!(%phase, "Discovery phase");
}
