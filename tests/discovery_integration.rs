// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for UDP discovery against fake units on loopback.
//!
//! Each fake unit owns a socket on its own loopback address, so answers
//! arrive from distinct sender IPs as they would on a real network.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use daikin_lib::discovery::{DiscoveryOptions, PROBE, discover};
use tokio::net::UdpSocket;

/// Probe target that makes the given units answer, starting with the
/// `answer_from`-th probe it receives.
struct FakeNetwork {
    probe_address: SocketAddr,
    probes: Arc<AtomicUsize>,
}

impl FakeNetwork {
    async fn start(answer_from: usize, units: &[(Ipv4Addr, &'static str)]) -> Self {
        let probe_socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let probe_address = probe_socket.local_addr().unwrap();
        let probes = Arc::new(AtomicUsize::new(0));

        let mut senders = Vec::new();
        for (ip, body) in units {
            let socket = UdpSocket::bind((*ip, 0)).await.unwrap();
            senders.push((socket, *body));
        }

        let counter = Arc::clone(&probes);
        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            loop {
                let Ok((len, from)) = probe_socket.recv_from(&mut buf).await else {
                    return;
                };
                if &buf[..len] != PROBE.as_bytes() {
                    continue;
                }
                let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if seen < answer_from {
                    continue;
                }
                for (socket, body) in &senders {
                    let _ = socket.send_to(body.as_bytes(), from).await;
                }
            }
        });

        Self {
            probe_address,
            probes,
        }
    }

    fn options(&self) -> DiscoveryOptions {
        DiscoveryOptions::new()
            .with_listen_address(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .with_probe_address(self.probe_address)
    }

    fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

fn unit(last_octet: u8) -> Ipv4Addr {
    Ipv4Addr::new(127, 0, 0, last_octet)
}

#[tokio::test]
async fn stops_probing_once_quota_is_met() {
    let network = FakeNetwork::start(
        3,
        &[
            (unit(1), "ret=OK,name=one,port=30050"),
            (unit(2), "ret=OK,name=two,port=30050"),
            (unit(3), "ret=OK,name=three,port=30050"),
            (unit(4), "ret=OK,name=four,port=30050"),
        ],
    )
    .await;

    let options = network
        .options()
        .with_waitfor(4)
        .with_probe_attempts(10)
        .with_probe_interval(Duration::from_millis(200))
        .with_timeout(Duration::from_secs(5));

    let started = Instant::now();
    let result = discover(&options).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.len(), 4);
    assert_eq!(network.probes(), 3);
    assert!(elapsed < Duration::from_millis(900), "took {elapsed:?}");

    let four = result.get(&IpAddr::V4(unit(4))).unwrap();
    assert_eq!(four.get("name"), Some("four"));
    assert_eq!(four.get("port"), Some("30050"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn discovery_runs_on_a_spawned_task() {
    fn assert_send<T: Send>(_: &T) {}

    let network = FakeNetwork::start(1, &[(unit(1), "ret=OK,name=one")]).await;
    let options = network
        .options()
        .with_waitfor(1)
        .with_probe_attempts(3)
        .with_probe_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(2));

    let running = discover(&options);
    assert_send(&running);
    drop(running);

    let result = tokio::spawn(async move { discover(&options).await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.addresses(), vec![IpAddr::V4(unit(1))]);
}

#[tokio::test]
async fn returns_partial_result_after_timeout() {
    let network = FakeNetwork::start(
        1,
        &[
            (unit(1), "ret=OK,name=one"),
            (unit(2), "ret=OK,name=two"),
        ],
    )
    .await;

    let options = network
        .options()
        .with_waitfor(4)
        .with_probe_attempts(3)
        .with_probe_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(1));

    let started = Instant::now();
    let result = discover(&options).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(
        result.addresses(),
        vec![IpAddr::V4(unit(1)), IpAddr::V4(unit(2))]
    );
    assert_eq!(network.probes(), 3);
    assert!(elapsed >= Duration::from_millis(900), "took {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[tokio::test]
async fn malformed_and_rejected_answers_are_dropped() {
    let network = FakeNetwork::start(
        1,
        &[
            (unit(1), "ret=OK,name=good"),
            (unit(2), "garbage without status"),
            (unit(3), "ret=PARAM NG"),
        ],
    )
    .await;

    let options = network
        .options()
        .with_waitfor(2)
        .with_probe_attempts(2)
        .with_probe_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_millis(500));

    let result = discover(&options).await.unwrap();

    assert_eq!(result.addresses(), vec![IpAddr::V4(unit(1))]);
    assert_eq!(
        result.get(&IpAddr::V4(unit(1))).unwrap().get("name"),
        Some("good")
    );
}

#[tokio::test]
async fn repeated_answers_keep_one_entry_per_unit() {
    let network = FakeNetwork::start(1, &[(unit(1), "ret=OK,name=one")]).await;

    let options = network
        .options()
        .with_waitfor(2)
        .with_probe_attempts(4)
        .with_probe_interval(Duration::from_millis(50))
        .with_timeout(Duration::from_millis(400));

    let result = discover(&options).await.unwrap();

    assert_eq!(network.probes(), 4);
    assert_eq!(result.len(), 1);
}
