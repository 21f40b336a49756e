//! The fritz_smart_check crate turns FRITZ!Box smart home devices (DECT thermostats and smart
//! sockets) into nagios/icinga checks.
//!
//! A [SmartCheck] fetches the generic device infos of one device through a [RemoteCall]
//! implementation, derives a measurement, evaluates it against optional warning and critical
//! [Threshold]s and renders a single status line.
//!
//! ```rust
//! # use std::collections::HashMap;
//! use fritz_smart_check::{
//!     CheckKind, RemoteCall, Request, ResponseFields, ServiceState, SmartCheck, TransportError,
//! };
//!
//! struct Socket;
//!
//! impl RemoteCall for Socket {
//!     fn execute(&self, _request: &Request) -> Result<ResponseFields, TransportError> {
//!         let mut fields = HashMap::new();
//!         fields.insert("NewProductName".to_owned(), "FRITZ!DECT 200".to_owned());
//!         fields.insert("NewFirmwareVersion".to_owned(), "04.25".to_owned());
//!         fields.insert("NewDeviceName".to_owned(), "Kitchen".to_owned());
//!         fields.insert("NewMultimeterPower".to_owned(), "4530".to_owned());
//!         Ok(fields)
//!     }
//! }
//!
//! let result = SmartCheck::new(CheckKind::SocketPower, 0)
//!     .with_warning("50".parse().ok())
//!     .execute(&Socket);
//!
//! assert_eq!(result.state(), ServiceState::Ok);
//! assert_eq!(
//!     result.to_nagios_string(),
//!     "OK - FRITZ!DECT 200 04.25 - Kitchen 45.30 W | power=45.3;50;"
//! );
//! ```

use std::cmp::Ordering;
use std::fmt;

mod check;
mod device;
mod helper;
mod metric;
mod resource;
mod runner;
mod threshold;

pub use crate::check::{CheckError, CheckKind, SmartCheck, UnknownCheckKind};
pub use crate::device::{
    DeviceInfo, RemoteCall, Request, ResponseFields, TransportError, PRESENT_CONNECTED,
    TEMPERATURE_ENABLED,
};
pub use crate::helper::safe_run;
pub use crate::metric::{Metric, Unit, UnitString, UnitStringError};
pub use crate::resource::Resource;
pub use crate::runner::{Runner, RunnerResult};
pub use crate::threshold::{Threshold, ThresholdError, Thresholds, TriggerIfValue};

/// Represents a service state from nagios.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// Returns the corresponding nagios exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }

    fn severity(&self) -> Option<u8> {
        match self {
            ServiceState::Ok => Some(0),
            ServiceState::Warning => Some(1),
            ServiceState::Critical => Some(2),
            ServiceState::Unknown => None,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Ok < Warning < Critical. Unknown is only comparable to itself.
impl PartialOrd for ServiceState {
    fn partial_cmp(&self, other: &ServiceState) -> Option<Ordering> {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            (None, None) => Some(Ordering::Equal),
            _ => None,
        }
    }
}
