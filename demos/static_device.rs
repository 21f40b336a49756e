use std::collections::HashMap;
use std::env::args;

use anyhow::Context;

use fritz_smart_check::{
    CheckKind, RemoteCall, Request, ResponseFields, SmartCheck, Threshold, Thresholds,
    TransportError,
};

// Usage: cargo run --example static_device -- <check> [warning] [critical]
//        cargo run --example static_device -- smart_heatertemperatur 20 16

/// A box that always answers with the same thermostat/socket combination.
struct StaticDevice(ResponseFields);

impl RemoteCall for StaticDevice {
    fn execute(&self, request: &Request) -> Result<ResponseFields, TransportError> {
        match request.argument("NewIndex") {
            Some("0") => Ok(self.0.clone()),
            other => Err(TransportError::new(format!("no device at index {:?}", other))),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = args().skip(1);

    let kind: CheckKind = args
        .next()
        .unwrap_or_else(|| CheckKind::Temperature.to_string())
        .parse()?;
    let warning = args
        .next()
        .map(|w| w.parse::<Threshold>())
        .transpose()
        .context("invalid warning threshold")?;
    let critical = args
        .next()
        .map(|c| c.parse::<Threshold>())
        .transpose()
        .context("invalid critical threshold")?;

    let device = StaticDevice(HashMap::from(
        [
            ("NewProductName", "FRITZ!DECT 301"),
            ("NewFirmwareVersion", "05.08"),
            ("NewDeviceName", "Bathroom"),
            ("NewPresent", "CONNECTED"),
            ("NewTemperatureIsEnabled", "ENABLED"),
            ("NewTemperatureCelsius", "185"),
            ("NewMultimeterPower", "4530"),
            ("NewMultimeterEnergy", "12000"),
        ]
        .map(|(k, v)| (k.to_owned(), v.to_owned())),
    ));

    SmartCheck::new(kind, 0)
        .with_thresholds(Thresholds::new(warning, critical))
        .execute(&device)
        .print_and_exit()
}
