#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the RFXtrx bridge.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Accessory lists live under `[devices]`, one array of tables per kind.
use std::collections::HashSet;

use serde::Deserialize;

/// Longest travel time accepted for a cover, in seconds.
pub const MAX_DURATION_SECONDS: f64 = 3600.0;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Transport {
    /// Serial device of the RFXtrx transceiver
    pub tty: String,
    /// Ask the driver for verbose packet logging
    pub debug: bool,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            tty: "/dev/ttyUSB0".to_string(),
            debug: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Somfy RTS cover.
#[derive(Debug, Deserialize, Clone)]
pub struct RfyDevice {
    pub device_id: String,
    pub name: String,
    #[serde(default)]
    pub reversed: bool,
    /// Seconds to travel from closed (0) to open (100)
    pub open_duration_seconds: Option<f64>,
    /// Seconds to travel from open (100) to closed (0)
    pub close_duration_seconds: Option<f64>,
    /// Older configs carry a single duration for both directions.
    #[serde(default)]
    pub open_close_duration_seconds: Option<f64>,
    #[serde(default)]
    pub force_close_at_startup: bool,
}

impl RfyDevice {
    /// Effective opening duration; falls back to the legacy shared duration.
    pub fn open_seconds(&self) -> Option<f64> {
        self.open_duration_seconds
            .or(self.open_close_duration_seconds)
    }

    /// Effective closing duration; falls back to the legacy shared duration.
    pub fn close_seconds(&self) -> Option<f64> {
        self.close_duration_seconds
            .or(self.open_close_duration_seconds)
    }
}

/// On/off actuator reached through one of the rfxcom lighting families.
#[derive(Debug, Deserialize, Clone)]
pub struct SwitchDevice {
    pub device_id: String,
    pub name: String,
    /// Transmitter family, e.g. "Lighting2"
    #[serde(rename = "type")]
    pub kind: String,
    /// Family subtype, e.g. "AC"
    pub subtype: String,
    #[serde(default)]
    pub force_off_at_startup: bool,
}

/// Passive temperature / humidity sensor.
#[derive(Debug, Deserialize, Clone)]
pub struct WeatherSensorDevice {
    pub device_id: String,
    pub name: String,
    /// Receiver event family, e.g. "temperaturehumidity1"
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Devices {
    pub rfy: Vec<RfyDevice>,
    pub switch: Vec<SwitchDevice>,
    pub weather_sensor: Vec<WeatherSensorDevice>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Display name of the platform
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub devices: Devices,
}

fn default_name() -> String {
    "RFXCOM".to_string()
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file; validation is left to the caller.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

fn check_duration(field: &str, name: &str, value: Option<f64>) -> eyre::Result<()> {
    if let Some(s) = value {
        if !s.is_finite() || s < 0.0 {
            eyre::bail!("devices.rfy '{name}': {field} must be a finite value >= 0");
        }
        if s > MAX_DURATION_SECONDS {
            eyre::bail!("devices.rfy '{name}': {field} is unreasonably large (>1h)");
        }
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Transport
        if self.transport.tty.trim().is_empty() {
            eyre::bail!("transport.tty must not be empty");
        }

        // Logging
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // The bridge addresses accessories by name, across all kinds.
        let mut names = HashSet::new();
        let all_names = self
            .devices
            .rfy
            .iter()
            .map(|d| (&d.name, &d.device_id))
            .chain(self.devices.switch.iter().map(|d| (&d.name, &d.device_id)))
            .chain(
                self.devices
                    .weather_sensor
                    .iter()
                    .map(|d| (&d.name, &d.device_id)),
            );
        for (name, id) in all_names {
            if name.trim().is_empty() {
                eyre::bail!("device '{id}' must have a non-empty name");
            }
            if id.trim().is_empty() {
                eyre::bail!("device '{name}' must have a non-empty device_id");
            }
            if !names.insert(name.as_str()) {
                eyre::bail!("duplicate device name '{name}'");
            }
        }

        // Covers
        for d in &self.devices.rfy {
            check_duration("open_duration_seconds", &d.name, d.open_duration_seconds)?;
            check_duration("close_duration_seconds", &d.name, d.close_duration_seconds)?;
            check_duration(
                "open_close_duration_seconds",
                &d.name,
                d.open_close_duration_seconds,
            )?;
            if d.open_seconds().is_none() || d.close_seconds().is_none() {
                eyre::bail!(
                    "devices.rfy '{}': open_duration_seconds and close_duration_seconds are required",
                    d.name
                );
            }
        }

        // Switches: family names are checked when the accessory is built,
        // only shape is checked here.
        for d in &self.devices.switch {
            if d.kind.trim().is_empty() {
                eyre::bail!("devices.switch '{}': type must not be empty", d.name);
            }
        }

        for d in &self.devices.weather_sensor {
            if d.kind.trim().is_empty() {
                eyre::bail!("devices.weather_sensor '{}': type must not be empty", d.name);
            }
        }

        Ok(())
    }
}
