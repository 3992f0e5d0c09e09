// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Concurrent queries across several units.
//!
//! Units share nothing but the read-only [`HttpConfig`], so each one is
//! queried by its own task. One unit failing does not affect the others.
//!
//! ```no_run
//! use daikin_lib::discovery::{DiscoveryOptions, discover};
//! use daikin_lib::fleet::snapshot_all;
//! use daikin_lib::protocol::HttpConfig;
//!
//! # async fn example() -> daikin_lib::Result<()> {
//! let units = discover(&DiscoveryOptions::quick()).await?;
//! let reports = snapshot_all(units.addresses(), &HttpConfig::new("")).await;
//!
//! for report in reports {
//!     match report.result {
//!         Ok(snapshot) => println!("{}: {}", report.host, snapshot.name()),
//!         Err(e) => println!("{}: {e}", report.host),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::device::Aircon;
use crate::error::{Error, ProtocolError};
use crate::protocol::HttpConfig;

pub use crate::device::UnitSnapshot;

/// Outcome of querying one unit.
#[derive(Debug)]
pub struct UnitReport {
    /// Host the unit was reached at.
    pub host: String,
    /// Snapshot, or the error that prevented it.
    pub result: Result<UnitSnapshot, Error>,
}

/// Snapshots every unit at once.
///
/// `config` supplies port and timeout; its host is replaced by each entry of
/// `hosts`. Reports come back in the order of `hosts`.
pub async fn snapshot_all<I, H>(hosts: I, config: &HttpConfig) -> Vec<UnitReport>
where
    I: IntoIterator<Item = H>,
    H: ToString,
{
    let hosts: Vec<String> = hosts.into_iter().map(|h| h.to_string()).collect();
    let limit = hosts.len();
    snapshot_hosts(hosts, config, limit).await
}

/// Snapshots units with at most `limit` queries in flight.
///
/// A `limit` of zero is treated as one.
pub async fn snapshot_all_with_limit<I, H>(
    hosts: I,
    config: &HttpConfig,
    limit: usize,
) -> Vec<UnitReport>
where
    I: IntoIterator<Item = H>,
    H: ToString,
{
    let hosts: Vec<String> = hosts.into_iter().map(|h| h.to_string()).collect();
    snapshot_hosts(hosts, config, limit).await
}

async fn snapshot_hosts(hosts: Vec<String>, config: &HttpConfig, limit: usize) -> Vec<UnitReport> {
    if hosts.is_empty() {
        return Vec::new();
    }

    let workers = limit.clamp(1, hosts.len());
    tracing::debug!(units = hosts.len(), workers, "Querying units");

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    for (index, host) in hosts.iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let config = config.for_host(host.clone());
        tasks.spawn(async move {
            // Held until the query finishes.
            let _permit = semaphore.acquire_owned().await.ok();
            (index, snapshot_one(config).await)
        });
    }

    let mut results: Vec<Option<Result<UnitSnapshot, Error>>> =
        std::iter::repeat_with(|| None).take(hosts.len()).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => tracing::warn!(error = %e, "Unit query task failed"),
        }
    }

    hosts
        .into_iter()
        .zip(results)
        .map(|(host, result)| {
            let result = result.unwrap_or_else(|| {
                Err(ProtocolError::ConnectionFailed("query task failed".to_string()).into())
            });
            if let Err(e) = &result {
                tracing::warn!(host = %host, error = %e, "Unit query failed");
            }
            UnitReport { host, result }
        })
        .collect()
}

async fn snapshot_one(config: HttpConfig) -> Result<UnitSnapshot, Error> {
    let client = config.into_client()?;
    Aircon::new(client).snapshot().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_hosts_no_reports() {
        let reports = snapshot_all(Vec::<String>::new(), &HttpConfig::new("")).await;
        assert!(reports.is_empty());
    }
}
