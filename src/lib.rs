// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `daikin_lib` - A Rust library to discover and control Daikin air
//! conditioners on the local network.
//!
//! Units speak a plain-text `key=value` protocol: UDP broadcast for
//! discovery and HTTP `GET` for reading and writing state. Every answer
//! starts with a `ret=` status token.
//!
//! # Supported Features
//!
//! - **Discovery**: UDP broadcast probe with early exit once enough units answered
//! - **Identity**: name, MAC address, firmware version
//! - **Telemetry**: indoor/outdoor temperature, humidity
//! - **Control**: power, mode, target temperature, fan rate, fan direction
//!
//! Control writes are read-modify-write: units reset every mutable field a
//! write omits, so [`Aircon`] re-sends the current value of every setting
//! that is not being changed.
//!
//! # Quick Start
//!
//! ## Single Unit
//!
//! ```no_run
//! use daikin_lib::Aircon;
//! use daikin_lib::types::{FanRate, Mode};
//!
//! #[tokio::main]
//! async fn main() -> daikin_lib::Result<()> {
//!     // Returns (aircon, basic_info) tuple
//!     let (aircon, info) = Aircon::http("192.168.1.20").build().await?;
//!     println!("{:?} runs firmware {:?}", info.name, info.firmware_version);
//!
//!     aircon.set_mode(Mode::Heat).await?;
//!     aircon.set_fan_rate(FanRate::Silent).await?;
//!
//!     let sensors = aircon.get_sensor_info().await?;
//!     println!("Indoor: {}", sensors.indoor_temperature);
//!     Ok(())
//! }
//! ```
//!
//! ## Discovery
//!
//! ```no_run
//! use daikin_lib::{Aircon, DiscoveryOptions, discover};
//!
//! #[tokio::main]
//! async fn main() -> daikin_lib::Result<()> {
//!     let units = discover(&DiscoveryOptions::new().with_waitfor(2)).await?;
//!
//!     for address in units.addresses() {
//!         let aircon = Aircon::http(address.to_string()).build_without_probe()?;
//!         println!("{address}: power {:?}", aircon.power().await?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library emits [`tracing`] events and never installs a subscriber.

pub mod coercion;
pub mod command;
mod device;
#[cfg(feature = "discovery")]
pub mod discovery;
pub mod error;
#[cfg(feature = "http")]
pub mod fleet;
pub mod protocol;
pub mod response;
pub mod types;
pub mod wire;

pub use command::{ControlCommand, ControlUpdate, Endpoint, MergePolicy};
#[cfg(feature = "http")]
pub use device::AirconBuilder;
pub use device::{Aircon, UnitSnapshot};
#[cfg(feature = "discovery")]
pub use discovery::{DiscoveryOptions, DiscoveryResult, discover};
pub use error::{
    DeviceError, Error, ParseError, ProtocolError, RejectReason, Result, ValueError,
};
#[cfg(feature = "http")]
pub use protocol::HttpConfig;
pub use response::{BasicInfo, ControlInfo, SensorInfo};
pub use types::{FanDirection, FanRate, Mode, Setpoint, Temperature};
pub use wire::RawRecord;
