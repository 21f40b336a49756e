use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Deserialize;

use crate::device::{DeviceInfo, RemoteCall, Request, TransportError};
use crate::helper::safe_run;
use crate::metric::Metric;
use crate::resource::Resource;
use crate::runner::RunnerResult;
use crate::threshold::{Threshold, Thresholds, TriggerIfValue};
use crate::ServiceState;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("malformed device response: {0}")]
    Response(#[from] serde::de::value::Error),
    #[error("{field} is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown check '{0}'")]
pub struct UnknownCheckKind(String);

/// The smart home checks, one per measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CheckKind {
    /// Whether the box can reach the device.
    Status,
    /// Temperature of a thermostat, breaching when it falls below a threshold.
    Temperature,
    /// Current power draw of a smart socket.
    SocketPower,
    /// Energy consumed through a smart socket.
    SocketEnergy,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Status,
        CheckKind::Temperature,
        CheckKind::SocketPower,
        CheckKind::SocketEnergy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::Status => "smart_status",
            CheckKind::Temperature => "smart_heatertemperatur",
            CheckKind::SocketPower => "smart_socketpower",
            CheckKind::SocketEnergy => "smart_socketenergy",
        }
    }

    fn measurement(self) -> Option<&'static Measurement> {
        match self {
            CheckKind::Status => None,
            CheckKind::Temperature => Some(&TEMPERATURE),
            CheckKind::SocketPower => Some(&POWER),
            CheckKind::SocketEnergy => Some(&ENERGY),
        }
    }

    fn fallback_message(self) -> &'static str {
        match self.measurement() {
            Some(measurement) => measurement.fallback,
            None => "Not able to determine smart device status",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckKind {
    type Err = UnknownCheckKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownCheckKind(s.to_owned()))
    }
}

impl TryFrom<String> for CheckKind {
    type Error = UnknownCheckKind;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A capability the device must report before its reading means anything.
struct Precondition {
    holds: fn(&DeviceInfo) -> bool,
    message: &'static str,
}

/// Everything that differs between the numeric checks.
struct Measurement {
    label: &'static str,
    field_name: &'static str,
    field: fn(&DeviceInfo) -> &str,
    divisor: f64,
    trigger: TriggerIfValue,
    unit: &'static str,
    precondition: Option<Precondition>,
    fallback: &'static str,
}

fn temperature_field(info: &DeviceInfo) -> &str {
    &info.temperature_celsius
}

fn power_field(info: &DeviceInfo) -> &str {
    &info.multimeter_power
}

fn energy_field(info: &DeviceInfo) -> &str {
    &info.multimeter_energy
}

static TEMPERATURE: Measurement = Measurement {
    label: "temperature",
    field_name: "NewTemperatureCelsius",
    field: temperature_field,
    divisor: 10.0,
    trigger: TriggerIfValue::Less,
    unit: "°C",
    precondition: Some(Precondition {
        holds: DeviceInfo::is_temperature_enabled,
        message: "Temperature is not enabled on this smart device",
    }),
    fallback: "Not able to calculate heater temperature",
};

static POWER: Measurement = Measurement {
    label: "power",
    field_name: "NewMultimeterPower",
    field: power_field,
    divisor: 100.0,
    trigger: TriggerIfValue::Greater,
    unit: "W",
    precondition: None,
    fallback: "Not able to fetch socket power",
};

static ENERGY: Measurement = Measurement {
    label: "energy",
    field_name: "NewMultimeterEnergy",
    field: energy_field,
    divisor: 1000.0,
    trigger: TriggerIfValue::Greater,
    unit: "kWh",
    precondition: None,
    fallback: "Not able to fetch socket energy",
};

impl Measurement {
    fn read(&self, info: &DeviceInfo) -> Result<f64, CheckError> {
        let raw = (self.field)(info);

        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CheckError::InvalidNumber {
                field: self.field_name,
                value: raw.to_owned(),
            })?;

        Ok(value / self.divisor)
    }
}

/// One check of one smart home device.
///
/// ```rust
/// # use fritz_smart_check::{CheckKind, SmartCheck};
/// let check = SmartCheck::new(CheckKind::Temperature, 2)
///     .with_warning("20".parse().ok())
///     .with_critical("16".parse().ok());
/// assert_eq!(check.request().argument("NewIndex"), Some("2"));
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SmartCheck {
    kind: CheckKind,
    index: u32,
    #[serde(flatten)]
    thresholds: Thresholds,
}

impl SmartCheck {
    pub fn new(kind: CheckKind, index: u32) -> Self {
        SmartCheck {
            kind,
            index,
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_warning(mut self, warning: Option<Threshold>) -> Self {
        self.thresholds.warning = warning;
        self
    }

    pub fn with_critical(mut self, critical: Option<Threshold>) -> Self {
        self.thresholds.critical = critical;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn request(&self) -> Request {
        Request::generic_device_infos(self.index)
    }

    /// Fetches the device and evaluates it.
    ///
    /// Transport and parse failures are returned as errors without any partial result. A
    /// disabled temperature sensor is a regular [ServiceState::Unknown] outcome.
    pub fn run<C>(&self, client: &C) -> Result<Resource, CheckError>
    where
        C: RemoteCall + ?Sized,
    {
        let request = self.request();
        debug!(
            "running {} against device {} ({})",
            self.kind,
            self.index,
            request.action()
        );

        let info = DeviceInfo::from_fields(client.execute(&request)?)?;
        debug!("device {} is {}", self.index, info.header());

        let resource = match self.kind.measurement() {
            None => self.presence(&info),
            Some(measurement) => self.measure(&info, measurement)?,
        };

        Ok(resource)
    }

    /// Like [SmartCheck::run], with failures reported as [ServiceState::Unknown].
    pub fn execute<C>(&self, client: &C) -> RunnerResult<CheckError>
    where
        C: RemoteCall + ?Sized,
    {
        safe_run(|| self.run(client), ServiceState::Unknown)
    }

    fn presence(&self, info: &DeviceInfo) -> Resource {
        let state = if info.is_connected() {
            ServiceState::Ok
        } else {
            ServiceState::Critical
        };

        self.verdict(state, format!("{} {}", info.header(), info.present), None)
    }

    fn measure(
        &self,
        info: &DeviceInfo,
        measurement: &Measurement,
    ) -> Result<Resource, CheckError> {
        if let Some(precondition) = &measurement.precondition {
            if !(precondition.holds)(info) {
                debug!("{} skipped: {}", self.kind, precondition.message);
                return Ok(Resource::new(ServiceState::Unknown, precondition.message));
            }
        }

        let value = measurement.read(info)?;
        let state = self.thresholds.evaluate(value, measurement.trigger);
        debug!("{} = {} evaluated to {}", measurement.label, value, state);

        let metric = Metric::new(measurement.label, value).with_thresholds(&self.thresholds);
        let summary = format!("{} {:.2} {}", info.header(), value, measurement.unit);

        Ok(self.verdict(state, summary, Some(metric)))
    }

    fn verdict(&self, state: ServiceState, summary: String, metric: Option<Metric>) -> Resource {
        match state {
            ServiceState::Ok | ServiceState::Warning | ServiceState::Critical => metric
                .into_iter()
                .fold(Resource::new(state, summary), Resource::with_metric),
            ServiceState::Unknown => {
                Resource::new(ServiceState::Unknown, self.kind.fallback_message())
            }
        }
    }
}
