// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client for a single Daikin unit.
//!
//! Every method performs exactly one request cycle (or two, for merged
//! writes): nothing is cached, and the typed views returned are built fresh
//! from each answer.
//!
//! ```no_run
//! use daikin_lib::Aircon;
//! use daikin_lib::types::{Mode, Setpoint};
//!
//! # async fn example() -> daikin_lib::Result<()> {
//! let (aircon, info) = Aircon::http("192.168.1.20").build().await?;
//! println!("Connected to {:?}", info.name);
//!
//! aircon.set_mode(Mode::Cool).await?;
//! aircon.set_target_temperature(Setpoint::celsius(23.0)?).await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
mod http_builder;

#[cfg(feature = "http")]
pub use http_builder::AirconBuilder;

use serde::Serialize;

use crate::coercion::Strictness;
use crate::command::{ControlUpdate, Endpoint, MergePolicy, Request, merge_control_fields};
use crate::error::Error;
use crate::protocol::Protocol;
#[cfg(feature = "http")]
use crate::protocol::{HttpClient, HttpConfig};
use crate::response::{BasicInfo, ControlInfo, SensorInfo};
use crate::types::{FanDirection, FanRate, Mode, Setpoint, Temperature};
use crate::wire::RawRecord;

/// A Daikin air conditioning unit.
///
/// # Type Parameter
///
/// `P` is the transport; [`HttpClient`](crate::protocol::HttpClient) for real
/// units. Tests and alternative transports can supply their own
/// [`Protocol`] implementation through [`Aircon::new`].
#[derive(Debug, Clone)]
pub struct Aircon<P: Protocol> {
    protocol: P,
}

#[cfg(feature = "http")]
impl Aircon<HttpClient> {
    /// Starts building a client for the unit at `host`.
    #[must_use]
    pub fn http(host: impl Into<String>) -> AirconBuilder {
        AirconBuilder::new(HttpConfig::new(host))
    }

    /// Starts building a client from a full HTTP configuration.
    #[must_use]
    pub fn http_config(config: HttpConfig) -> AirconBuilder {
        AirconBuilder::new(config)
    }
}

impl<P: Protocol> Aircon<P> {
    /// Creates a client over an existing transport.
    pub fn new(protocol: P) -> Self {
        Self { protocol }
    }

    /// Returns the transport.
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Sends a request and returns the validated payload.
    async fn fetch(&self, request: &Request) -> Result<RawRecord, Error> {
        let response = self.protocol.send(request).await?;
        response.parse().inspect_err(|e| {
            tracing::debug!(
                target_unit = self.protocol.target(),
                endpoint = %request.endpoint(),
                error = %e,
                "Request failed"
            );
        })
    }

    // ========== Raw access ==========

    /// Reads the identity record without typing it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the unit reports a failure.
    pub async fn get_raw_basic_info(&self) -> Result<RawRecord, Error> {
        self.fetch(&Request::new(Endpoint::BasicInfo)).await
    }

    /// Reads the sensor record without typing it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the unit reports a failure.
    pub async fn get_raw_sensor_info(&self) -> Result<RawRecord, Error> {
        self.fetch(&Request::new(Endpoint::SensorInfo)).await
    }

    /// Reads the control record without typing it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the unit reports a failure.
    pub async fn get_raw_control_info(&self) -> Result<RawRecord, Error> {
        self.fetch(&Request::new(Endpoint::ControlInfo)).await
    }

    /// Writes raw control fields.
    ///
    /// With [`MergePolicy::Merge`] the current control state is read first,
    /// reduced to the mutable fields and overlaid with `fields`. With
    /// [`MergePolicy::Verbatim`] `fields` is sent unchanged. The answer's
    /// payload is discarded.
    ///
    /// # Errors
    ///
    /// Returns error if either request fails or the unit rejects the write.
    pub async fn set_raw_control_info(
        &self,
        fields: &RawRecord,
        policy: MergePolicy,
    ) -> Result<(), Error> {
        let query = match policy {
            MergePolicy::Merge => {
                let current = self.get_raw_control_info().await?;
                merge_control_fields(&current, fields)
            }
            MergePolicy::Verbatim => fields.clone(),
        };

        tracing::debug!(
            target_unit = self.protocol.target(),
            ?policy,
            fields = query.len(),
            "Writing control info"
        );

        self.fetch(&Request::with_query(Endpoint::SetControlInfo, query))
            .await
            .map(|_| ())
    }

    // ========== Typed reads ==========

    /// Reads the identity of the unit.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the unit reports a failure.
    /// Malformed identity fields do not fail the read.
    pub async fn get_basic_info(&self) -> Result<BasicInfo, Error> {
        Ok(BasicInfo::from_record(self.get_raw_basic_info().await?))
    }

    /// Reads the sensor telemetry.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the unit reports a failure, or a
    /// temperature field is malformed.
    pub async fn get_sensor_info(&self) -> Result<SensorInfo, Error> {
        Ok(SensorInfo::from_record(self.get_raw_sensor_info().await?)?)
    }

    /// Reads the current control settings.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the unit reports a failure, or a
    /// setpoint field is malformed.
    pub async fn get_control_info(&self) -> Result<ControlInfo, Error> {
        Ok(ControlInfo::from_record(self.get_raw_control_info().await?)?)
    }

    // ========== Writes ==========

    /// Writes a control update.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails or the unit rejects the write.
    pub async fn set_control_info(
        &self,
        update: &ControlUpdate,
        policy: MergePolicy,
    ) -> Result<(), Error> {
        let fields = update.to_record()?;
        self.set_raw_control_info(&fields, policy).await
    }

    /// Writes a control update merged over the current state.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails or the unit rejects the write.
    pub async fn update_control_info(&self, update: &ControlUpdate) -> Result<(), Error> {
        self.set_control_info(update, MergePolicy::Merge).await
    }

    /// Writes a complete control state, for example one saved earlier.
    ///
    /// No read is performed first. Every mutable field must be known.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` without sending anything if a
    /// mutable field of `state` is unknown, or the errors of a write.
    pub async fn restore_control_info(&self, state: &ControlInfo) -> Result<(), Error> {
        let fields = state.to_update().format(Strictness::Strict)?;
        self.set_raw_control_info(&fields, MergePolicy::Verbatim)
            .await
    }

    /// Reboots the unit's network adapter.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the unit reports a failure.
    pub async fn reboot(&self) -> Result<(), Error> {
        tracing::info!(target_unit = self.protocol.target(), "Rebooting unit");
        self.fetch(&Request::new(Endpoint::Reboot)).await.map(|_| ())
    }

    // ========== Convenience accessors ==========

    /// Returns the unit name.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails; an absent name is `None`.
    pub async fn name(&self) -> Result<Option<String>, Error> {
        Ok(self.get_basic_info().await?.name)
    }

    /// Returns the MAC address.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn mac_address(&self) -> Result<Option<String>, Error> {
        Ok(self.get_basic_info().await?.mac)
    }

    /// Returns the firmware version.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn firmware_version(&self) -> Result<Option<String>, Error> {
        Ok(self.get_basic_info().await?.firmware_version)
    }

    /// Returns the power state.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn power(&self) -> Result<Option<bool>, Error> {
        Ok(self.get_control_info().await?.power)
    }

    /// Turns the unit on or off.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn set_power(&self, on: bool) -> Result<(), Error> {
        self.update_control_info(&ControlUpdate::new().with_power(on))
            .await
    }

    /// Returns the operation mode.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn mode(&self) -> Result<Option<Mode>, Error> {
        Ok(self.get_control_info().await?.mode)
    }

    /// Sets the operation mode.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), Error> {
        self.update_control_info(&ControlUpdate::new().with_mode(mode))
            .await
    }

    /// Returns the target temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn target_temperature(&self) -> Result<Setpoint, Error> {
        Ok(self.get_control_info().await?.target_temperature)
    }

    /// Sets the target temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn set_target_temperature(&self, target: Setpoint) -> Result<(), Error> {
        self.update_control_info(&ControlUpdate::new().with_target_temperature(target))
            .await
    }

    /// Returns the fan speed.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn fan_rate(&self) -> Result<Option<FanRate>, Error> {
        Ok(self.get_control_info().await?.fan_rate)
    }

    /// Sets the fan speed.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn set_fan_rate(&self, rate: FanRate) -> Result<(), Error> {
        self.update_control_info(&ControlUpdate::new().with_fan_rate(rate))
            .await
    }

    /// Returns the swing direction.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn fan_direction(&self) -> Result<Option<FanDirection>, Error> {
        Ok(self.get_control_info().await?.fan_direction)
    }

    /// Sets the swing direction.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub async fn set_fan_direction(&self, direction: FanDirection) -> Result<(), Error> {
        self.update_control_info(&ControlUpdate::new().with_fan_direction(direction))
            .await
    }

    /// Returns the indoor temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn indoor_temperature(&self) -> Result<Temperature, Error> {
        Ok(self.get_sensor_info().await?.indoor_temperature)
    }

    /// Returns the outdoor temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    pub async fn outdoor_temperature(&self) -> Result<Temperature, Error> {
        Ok(self.get_sensor_info().await?.outdoor_temperature)
    }

    /// Reads identity, telemetry and settings concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error of the three reads.
    pub async fn snapshot(&self) -> Result<UnitSnapshot, Error> {
        let (basic, sensor, control) = tokio::try_join!(
            self.get_basic_info(),
            self.get_sensor_info(),
            self.get_control_info()
        )?;
        Ok(UnitSnapshot {
            basic,
            sensor,
            control,
        })
    }
}

/// Identity, telemetry and settings of a unit read together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSnapshot {
    /// Identity.
    pub basic: BasicInfo,
    /// Telemetry.
    pub sensor: SensorInfo,
    /// Current settings.
    pub control: ControlInfo,
}

impl UnitSnapshot {
    /// Returns the unit name, or an empty string.
    #[must_use]
    pub fn name(&self) -> &str {
        self.basic.name.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the unit is running.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.control.power.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::{DeviceError, ParseError, ProtocolError, RejectReason};
    use crate::protocol::Response;

    /// In-memory unit answering each endpoint with a canned body and
    /// recording every request it receives.
    #[derive(Debug, Clone, Default)]
    struct FakeUnit {
        control: Arc<Mutex<String>>,
        write_reply: Arc<Mutex<String>>,
        requests: Arc<Mutex<Vec<Request>>>,
    }

    impl FakeUnit {
        fn new(control: &str) -> Self {
            let unit = Self::default();
            *unit.control.lock() = control.to_string();
            *unit.write_reply.lock() = "ret=OK".to_string();
            unit
        }

        fn writes(&self) -> Vec<RawRecord> {
            self.requests
                .lock()
                .iter()
                .filter(|r| r.endpoint() == Endpoint::SetControlInfo)
                .map(|r| r.query().clone())
                .collect()
        }
    }

    impl Protocol for FakeUnit {
        async fn send(&self, request: &Request) -> Result<Response, ProtocolError> {
            self.requests.lock().push(request.clone());
            let body = match request.endpoint() {
                Endpoint::BasicInfo => "ret=OK,name=%42%65%64,mac=001122334455,ver=1_2_51,port=30050,pow=1,err=0".to_string(),
                Endpoint::SensorInfo => "ret=OK,htemp=21.0,hhum=-,otemp=9.5,err=0".to_string(),
                Endpoint::ControlInfo => self.control.lock().clone(),
                Endpoint::SetControlInfo => self.write_reply.lock().clone(),
                Endpoint::Reboot => "ret=OK".to_string(),
            };
            Ok(Response::new(body))
        }

        fn target(&self) -> &str {
            "fake"
        }
    }

    const COOLING: &str =
        "ret=OK,pow=1,mode=3,stemp=22.0,shum=0,f_rate=A,f_dir=0,alert=255,b_mode=3,b_shum=0";

    #[tokio::test]
    async fn merged_write_resends_all_mutable_fields() {
        let unit = FakeUnit::new(COOLING);
        let aircon = Aircon::new(unit.clone());

        aircon
            .set_target_temperature(Setpoint::Celsius(24.0))
            .await
            .unwrap();

        let writes = unit.writes();
        assert_eq!(writes.len(), 1);
        let expected: RawRecord = [
            ("pow", "1"),
            ("mode", "3"),
            ("stemp", "24.0"),
            ("shum", "0"),
            ("f_rate", "A"),
            ("f_dir", "0"),
        ]
        .into_iter()
        .collect();
        assert_eq!(writes[0], expected);
    }

    #[tokio::test]
    async fn verbatim_write_skips_read() {
        let unit = FakeUnit::new(COOLING);
        let aircon = Aircon::new(unit.clone());

        aircon
            .set_control_info(
                &ControlUpdate::new().with_power(false),
                MergePolicy::Verbatim,
            )
            .await
            .unwrap();

        let requests = unit.requests.lock().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path_and_query(), "/aircon/set_control_info?pow=0");
    }

    #[tokio::test]
    async fn rejected_write_propagates() {
        let unit = FakeUnit::new(COOLING);
        *unit.write_reply.lock() = "ret=PARAM NG".to_string();
        let aircon = Aircon::new(unit);

        let err = aircon.set_mode(Mode::Heat).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::Rejected {
                reason: RejectReason::BadParameters
            })
        ));
    }

    #[tokio::test]
    async fn failed_read_aborts_merged_write() {
        let unit = FakeUnit::new("ret=ADV_NG");
        let aircon = Aircon::new(unit.clone());

        assert!(aircon.set_power(true).await.is_err());
        assert!(unit.writes().is_empty());
    }

    #[tokio::test]
    async fn restore_requires_complete_state() {
        let unit = FakeUnit::new("ret=OK,pow=1,mode=6,stemp=--,shum=--,f_rate=3,f_dir=0");
        let aircon = Aircon::new(unit.clone());

        let state = aircon.get_control_info().await.unwrap();
        let err = aircon.restore_control_info(&state).await.unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingField(ref f)) if f == "stemp"));
        assert!(unit.writes().is_empty());
    }

    #[tokio::test]
    async fn restore_sends_state_without_reading() {
        let unit = FakeUnit::new(COOLING);
        let aircon = Aircon::new(unit.clone());
        let state = aircon.get_control_info().await.unwrap();
        unit.requests.lock().clear();

        aircon.restore_control_info(&state).await.unwrap();

        let requests = unit.requests.lock().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query().get("stemp"), Some("22.0"));
        assert_eq!(requests[0].query().get("shum"), Some("0.0"));
    }

    #[tokio::test]
    async fn accessors_read_typed_values() {
        let aircon = Aircon::new(FakeUnit::new(COOLING));

        assert_eq!(aircon.name().await.unwrap().as_deref(), Some("Bed"));
        assert_eq!(aircon.power().await.unwrap(), Some(true));
        assert_eq!(aircon.mode().await.unwrap(), Some(Mode::Cool));
        assert_eq!(aircon.fan_rate().await.unwrap(), Some(FanRate::Auto));
        assert_eq!(
            aircon.fan_direction().await.unwrap(),
            Some(FanDirection::Stopped)
        );
        assert_eq!(
            aircon.indoor_temperature().await.unwrap(),
            Temperature::Celsius(21.0)
        );
        assert_eq!(
            aircon.outdoor_temperature().await.unwrap(),
            Temperature::Celsius(9.5)
        );
    }

    #[tokio::test]
    async fn snapshot_reads_all_endpoints() {
        let aircon = Aircon::new(FakeUnit::new(COOLING));
        let snapshot = aircon.snapshot().await.unwrap();
        assert_eq!(snapshot.name(), "Bed");
        assert!(snapshot.is_on());
        assert_eq!(snapshot.control.target_temperature, Setpoint::Celsius(22.0));
    }

    #[tokio::test]
    async fn snapshot_serializes_without_raw_records() {
        let aircon = Aircon::new(FakeUnit::new(COOLING));
        let json = serde_json::to_value(aircon.snapshot().await.unwrap()).unwrap();

        assert_eq!(json["basic"]["name"], "Bed");
        assert_eq!(json["control"]["power"], true);
        assert_eq!(json["control"]["mode"], "cool");
        assert_eq!(json["sensor"]["indoor_temperature"]["celsius"], 21.0);
        assert!(json["basic"].get("raw").is_none());
    }

    #[tokio::test]
    async fn reboot_discards_payload() {
        let unit = FakeUnit::new(COOLING);
        let aircon = Aircon::new(unit.clone());
        aircon.reboot().await.unwrap();
        assert_eq!(unit.requests.lock()[0].endpoint(), Endpoint::Reboot);
    }
}
