//! `From` implementations bridging `rfx_config` types to `rfx_core` profiles.
//!
//! Durations are read through the config's effective accessors, so the
//! legacy shared duration is honoured here. Call `Config::validate()` first;
//! a missing duration maps to 0.

use crate::config::{RfyProfile, SwitchProfile, WeatherSensorProfile};
use crate::device::Device;

// ── RfyProfile ───────────────────────────────────────────────────────────────

impl From<&rfx_config::RfyDevice> for RfyProfile {
    fn from(c: &rfx_config::RfyDevice) -> Self {
        Self {
            id: c.device_id.clone(),
            name: c.name.clone(),
            reversed: c.reversed,
            open_duration_s: c.open_seconds().unwrap_or(0.0),
            close_duration_s: c.close_seconds().unwrap_or(0.0),
            force_close_at_startup: c.force_close_at_startup,
        }
    }
}

// ── SwitchProfile ────────────────────────────────────────────────────────────

impl From<&rfx_config::SwitchDevice> for SwitchProfile {
    fn from(c: &rfx_config::SwitchDevice) -> Self {
        Self {
            id: c.device_id.clone(),
            name: c.name.clone(),
            kind: c.kind.clone(),
            subtype: c.subtype.clone(),
            force_off_at_startup: c.force_off_at_startup,
        }
    }
}

// ── WeatherSensorProfile ─────────────────────────────────────────────────────

impl From<&rfx_config::WeatherSensorDevice> for WeatherSensorProfile {
    fn from(c: &rfx_config::WeatherSensorDevice) -> Self {
        Self {
            id: c.device_id.clone(),
            name: c.name.clone(),
            kind: c.kind.clone(),
        }
    }
}

// ── Devices ──────────────────────────────────────────────────────────────────

/// Every configured device in registration order: covers, switches, sensors.
pub fn devices_from_config(cfg: &rfx_config::Config) -> Vec<Device> {
    let d = &cfg.devices;
    d.rfy
        .iter()
        .map(|c| Device::Rfy(c.into()))
        .chain(d.switch.iter().map(|c| Device::Switch(c.into())))
        .chain(
            d.weather_sensor
                .iter()
                .map(|c| Device::WeatherSensor(c.into())),
        )
        .collect()
}
