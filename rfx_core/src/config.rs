//! Runtime device profiles.
//!
//! These are the validated, immutable settings an accessory is built from.
//! `conversions` maps the TOML schema from `rfx_config` onto them.

use rfx_traits::Address;

/// Somfy RTS cover.
#[derive(Debug, Clone, PartialEq)]
pub struct RfyProfile {
    /// Radio unit identifier, e.g. `0x010203/1`.
    pub id: String,
    pub name: String,
    /// Swap the direction mapping for motors wired the other way round.
    pub reversed: bool,
    /// Full travel time used for `Down` moves, in seconds.
    pub open_duration_s: f64,
    /// Full travel time used for `Up` moves, in seconds.
    pub close_duration_s: f64,
    pub force_close_at_startup: bool,
}

impl RfyProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, open_s: f64, close_s: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reversed: false,
            open_duration_s: open_s,
            close_duration_s: close_s,
            force_close_at_startup: false,
        }
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn force_close_at_startup(mut self, force: bool) -> Self {
        self.force_close_at_startup = force;
        self
    }

    pub fn address(&self) -> Address {
        Address::rfy(self.id.clone())
    }
}

/// On/off actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchProfile {
    pub id: String,
    pub name: String,
    /// Family name as written in the config, e.g. `Lighting2`.
    pub kind: String,
    pub subtype: String,
    pub force_off_at_startup: bool,
}

impl SwitchProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        subtype: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            subtype: subtype.into(),
            force_off_at_startup: false,
        }
    }

    pub fn force_off_at_startup(mut self, force: bool) -> Self {
        self.force_off_at_startup = force;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSensorProfile {
    pub id: String,
    pub name: String,
    pub kind: String,
}

impl WeatherSensorProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}
