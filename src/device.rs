//! The remote side of a check: the TR-064 request for a smart home device and the record it
//! answers with. Transports (SOAP over HTTP(S), authentication, timeouts) live behind
//! [RemoteCall].

use std::collections::HashMap;
use std::error::Error;

use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::de::IntoDeserializer;
use serde::Deserialize;

pub const HOMEAUTO_CONTROL_URL: &str = "/upnp/control/x_homeauto";
pub const HOMEAUTO_SERVICE: &str = "X_AVM-DE_Homeauto";
pub const GET_GENERIC_DEVICE_INFOS: &str = "GetGenericDeviceInfos";

/// Value of `NewPresent` for a device the box can currently reach.
pub const PRESENT_CONNECTED: &str = "CONNECTED";
/// Value of `NewTemperatureIsEnabled` for a device with a working temperature sensor.
pub const TEMPERATURE_ENABLED: &str = "ENABLED";

/// Flat field name to value mapping of one response.
pub type ResponseFields = HashMap<String, String>;

/// One remote procedure call against the box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    control_url: &'static str,
    service: &'static str,
    action: &'static str,
    arguments: Vec<(&'static str, String)>,
}

impl Request {
    /// `GetGenericDeviceInfos` for the device at `index`.
    pub fn generic_device_infos(index: u32) -> Self {
        Request {
            control_url: HOMEAUTO_CONTROL_URL,
            service: HOMEAUTO_SERVICE,
            action: GET_GENERIC_DEVICE_INFOS,
            arguments: vec![("NewIndex", index.to_string())],
        }
    }

    pub fn control_url(&self) -> &str {
        self.control_url
    }

    pub fn service(&self) -> &str {
        self.service
    }

    pub fn action(&self) -> &str {
        self.action
    }

    pub fn arguments(&self) -> &[(&'static str, String)] {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Any failure of the transport. Its content is opaque to the checks.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(Box<dyn Error + Send + Sync>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        TransportError(err.into())
    }
}

/// Executes a single request against the box and returns the response fields.
///
/// Implementations own everything about the connection: host, port, credentials, TLS and
/// timeouts. A check calls `execute` exactly once and never retries.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteCall {
    fn execute(&self, request: &Request) -> Result<ResponseFields, TransportError>;
}

/// The part of a `GetGenericDeviceInfos` response the checks read. Missing fields are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    #[serde(rename = "NewProductName")]
    pub product_name: String,
    #[serde(rename = "NewFirmwareVersion")]
    pub firmware_version: String,
    #[serde(rename = "NewDeviceName")]
    pub device_name: String,
    #[serde(rename = "NewPresent")]
    pub present: String,
    #[serde(rename = "NewTemperatureIsEnabled")]
    pub temperature_is_enabled: String,
    /// Tenths of a degree Celsius.
    #[serde(rename = "NewTemperatureCelsius")]
    pub temperature_celsius: String,
    /// Hundredths of a watt.
    #[serde(rename = "NewMultimeterPower")]
    pub multimeter_power: String,
    /// Watt hours.
    #[serde(rename = "NewMultimeterEnergy")]
    pub multimeter_energy: String,
}

impl DeviceInfo {
    pub fn from_fields(fields: ResponseFields) -> Result<Self, ValueError> {
        let deserializer: MapDeserializer<'_, _, ValueError> = fields.into_deserializer();
        DeviceInfo::deserialize(deserializer)
    }

    /// `<product> <firmware> - <device>`, the common head of every summary.
    pub fn header(&self) -> String {
        format!(
            "{} {} - {}",
            self.product_name, self.firmware_version, self.device_name
        )
    }

    pub fn is_connected(&self) -> bool {
        self.present == PRESENT_CONNECTED
    }

    pub fn is_temperature_enabled(&self) -> bool {
        self.temperature_is_enabled == TEMPERATURE_ENABLED
    }
}
