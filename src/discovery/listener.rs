// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP socket and background receiver of one discovery run.

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use parking_lot::Mutex;
use socket2::{Domain, Protocol as IpProtocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::ProtocolError;
use crate::wire::{RawRecord, parse_response};

/// Largest datagram a unit sends; basic info stays well below this.
const RECV_BUFFER_SIZE: usize = 2048;

type Discovered = Arc<Mutex<HashMap<IpAddr, RawRecord>>>;

/// Bound discovery socket with its receiver task.
///
/// The receiver records every valid answer keyed by sender address. Dropping
/// the listener aborts the receiver; once the task has released its handle
/// the socket is closed.
pub(crate) struct Listener {
    socket: Arc<UdpSocket>,
    discovered: Discovered,
    count: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl Listener {
    /// Binds the socket and starts the receiver.
    pub(crate) fn bind(address: SocketAddr) -> Result<Self, ProtocolError> {
        let socket = Socket::new(Domain::for_address(address), Type::DGRAM, Some(IpProtocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.set_broadcast(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&address.into())?;

        let socket = Arc::new(UdpSocket::from_std(socket.into())?);
        let discovered = Discovered::default();
        let (count_tx, count) = watch::channel(0);

        let task = tokio::spawn(receive_loop(
            Arc::clone(&socket),
            Arc::clone(&discovered),
            count_tx,
        ));

        Ok(Self {
            socket,
            discovered,
            count,
            task,
        })
    }

    /// Returns the bound address.
    pub(crate) fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sends one probe datagram.
    pub(crate) async fn send_probe(
        &self,
        probe: &[u8],
        target: SocketAddr,
    ) -> Result<(), ProtocolError> {
        self.socket.send_to(probe, target).await?;
        Ok(())
    }

    /// Returns the number of distinct units heard so far.
    pub(crate) fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Waits until `quota` units answered or `until` passes.
    ///
    /// Returns `true` if the quota was reached.
    pub(crate) async fn wait_for_quota(&mut self, quota: usize, until: Instant) -> bool {
        // The borrow guard from `wait_for` must not live across the sleep below.
        let outcome = tokio::time::timeout_at(until, self.count.wait_for(|n| *n >= quota))
            .await
            .map(|waited| waited.map(|_| ()));
        match outcome {
            Ok(Ok(())) => true,
            Ok(Err(_)) => {
                // Receiver is gone; nothing more can arrive.
                tokio::time::sleep_until(until).await;
                false
            }
            Err(_) => false,
        }
    }

    /// Stops the receiver and returns everything it recorded.
    pub(crate) async fn shutdown(mut self) -> HashMap<IpAddr, RawRecord> {
        self.task.abort();
        if let Err(e) = (&mut self.task).await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "Discovery receiver failed");
        }
        std::mem::take(&mut *self.discovered.lock())
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn receive_loop(socket: Arc<UdpSocket>, discovered: Discovered, count: watch::Sender<usize>) {
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        let (len, from) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused
                ) =>
            {
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discovery receiver stopped");
                return;
            }
        };

        match parse_response(&buf[..len]) {
            Ok(record) => {
                let total = {
                    let mut map = discovered.lock();
                    map.insert(from.ip(), record);
                    map.len()
                };
                tracing::debug!(address = %from.ip(), total, "Unit answered discovery probe");
                count.send_replace(total);
            }
            Err(e) => {
                tracing::debug!(address = %from, error = %e, "Dropping discovery datagram");
            }
        }
    }
}
