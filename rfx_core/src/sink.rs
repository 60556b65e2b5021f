//! Where state changes go.
//!
//! Accessories push every characteristic change into a `StateSink`. The
//! bridge front end decides what a sink does with it; the default only logs.

use crate::state::CoverSnapshot;

/// One observable change on an accessory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Characteristic {
    Cover(CoverSnapshot),
    On(bool),
    BatteryLevel(u8),
    Temperature(f64),
    Humidity(f64),
}

pub trait StateSink {
    /// Called synchronously after every state change on `accessory`.
    fn publish(&mut self, accessory: &str, update: Characteristic);
}

/// Logs updates through `tracing` and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StateSink for TracingSink {
    fn publish(&mut self, accessory: &str, update: Characteristic) {
        match update {
            Characteristic::Cover(s) => tracing::debug!(
                accessory,
                motion = %s.motion,
                target = s.target,
                current = s.current,
                "cover state"
            ),
            Characteristic::On(on) => tracing::debug!(accessory, on, "switch state"),
            Characteristic::BatteryLevel(level) => {
                tracing::debug!(accessory, level, "battery level")
            }
            Characteristic::Temperature(c) => tracing::debug!(accessory, celsius = c, "temperature"),
            Characteristic::Humidity(rh) => tracing::debug!(accessory, percent = rh, "humidity"),
        }
    }
}

impl<S: StateSink + ?Sized> StateSink for Box<S> {
    fn publish(&mut self, accessory: &str, update: Characteristic) {
        (**self).publish(accessory, update)
    }
}
