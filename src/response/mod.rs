// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed views of device responses.
//!
//! Each view is built from a [`RawRecord`](crate::wire::RawRecord) that has
//! already passed status validation, and keeps that record available through
//! a `raw()` accessor.

mod basic_info;
mod control_info;
mod sensor_info;

pub use basic_info::BasicInfo;
pub use control_info::ControlInfo;
pub use sensor_info::SensorInfo;
