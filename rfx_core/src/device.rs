//! Configured device descriptions and their stable identifiers.

use uuid::Uuid;

use crate::config::{RfyProfile, SwitchProfile, WeatherSensorProfile};

#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Rfy(RfyProfile),
    Switch(SwitchProfile),
    WeatherSensor(WeatherSensorProfile),
}

impl Device {
    pub fn kind(&self) -> &'static str {
        match self {
            Device::Rfy(_) => "RFYDevice",
            Device::Switch(_) => "SwitchDevice",
            Device::WeatherSensor(_) => "WeatherSensorDevice",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Device::Rfy(p) => &p.name,
            Device::Switch(p) => &p.name,
            Device::WeatherSensor(p) => &p.name,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Device::Rfy(p) => &p.id,
            Device::Switch(p) => &p.id,
            Device::WeatherSensor(p) => &p.id,
        }
    }

    /// Name-based UUID derived from kind and id; stable across restarts.
    pub fn uuid(&self) -> Uuid {
        let seed = format!("{}{}", self.kind(), self.id());
        Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_depends_on_kind_and_id_only() {
        let a = Device::Rfy(RfyProfile::new("0x01/1", "Kitchen", 10.0, 10.0));
        let b = Device::Rfy(RfyProfile::new("0x01/1", "Renamed", 20.0, 5.0));
        let c = Device::WeatherSensor(WeatherSensorProfile::new("0x01/1", "Kitchen", "temp1"));
        assert_eq!(a.uuid(), b.uuid());
        assert_ne!(a.uuid(), c.uuid());
    }
}
