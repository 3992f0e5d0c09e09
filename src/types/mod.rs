// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed values carried in Daikin control and sensor fields.

mod fan;
mod mode;
mod temperature;

pub use fan::{FanDirection, FanRate};
pub use mode::Mode;
pub use temperature::{Setpoint, Temperature};
