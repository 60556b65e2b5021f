//! Passive temperature / humidity sensor.
//!
//! Services appear lazily: a sensor only exposes battery, temperature or
//! humidity once a reading carrying that field has arrived.

use std::collections::BTreeMap;

use crate::config::WeatherSensorProfile;
use crate::sink::{Characteristic, StateSink};

/// One decoded receiver event. Absent fields are not reported by the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherReading {
    /// Percent, 0..=100.
    pub battery_level: Option<u8>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorService {
    Battery,
    Temperature,
    Humidity,
}

impl SensorService {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorService::Battery => "battery",
            SensorService::Temperature => "temperature",
            SensorService::Humidity => "humidity",
        }
    }
}

pub struct WeatherSensorAccessory {
    profile: WeatherSensorProfile,
    sink: Box<dyn StateSink>,
    services: BTreeMap<SensorService, f64>,
}

impl WeatherSensorAccessory {
    pub fn new(profile: WeatherSensorProfile, sink: Box<dyn StateSink>) -> Self {
        Self {
            profile,
            sink,
            services: BTreeMap::new(),
        }
    }

    pub fn profile(&self) -> &WeatherSensorProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Latest value of `service`, `None` until a reading carried it.
    pub fn value(&self, service: SensorService) -> Option<f64> {
        self.services.get(&service).copied()
    }

    /// Services exposed so far with their latest values.
    pub fn services(&self) -> impl Iterator<Item = (SensorService, f64)> + '_ {
        self.services.iter().map(|(s, v)| (*s, *v))
    }

    /// Whether this sensor's event family carries `service`.
    ///
    /// Families name what they measure (`temperature1`, `humidity1`,
    /// `temperaturehumidity1`, `temphumbaro1`); a family naming neither
    /// temperature nor humidity accepts both. Battery is always accepted.
    pub fn measures(&self, service: SensorService) -> bool {
        let kind = self.profile.kind.to_ascii_lowercase();
        let temp = kind.contains("temp");
        let hum = kind.contains("hum");
        match service {
            SensorService::Battery => true,
            SensorService::Temperature => temp || !hum,
            SensorService::Humidity => hum || !temp,
        }
    }

    fn carries(&self, service: SensorService) -> bool {
        let carried = self.measures(service);
        if !carried {
            tracing::debug!(
                sensor = %self.profile.name,
                kind = %self.profile.kind,
                service = service.as_str(),
                "field not carried by this family"
            );
        }
        carried
    }

    /// Record a reading. Fields that are absent, not finite, or not part of
    /// the sensor's family are skipped.
    pub fn apply(&mut self, reading: &WeatherReading) {
        let mut reading = *reading;
        if reading.temperature.is_some() && !self.carries(SensorService::Temperature) {
            reading.temperature = None;
        }
        if reading.humidity.is_some() && !self.carries(SensorService::Humidity) {
            reading.humidity = None;
        }
        if let Some(level) = reading.battery_level {
            let level = level.min(100);
            self.services
                .insert(SensorService::Battery, f64::from(level));
            self.sink
                .publish(&self.profile.name, Characteristic::BatteryLevel(level));
        }
        if let Some(c) = reading.temperature {
            if c.is_finite() {
                self.services.insert(SensorService::Temperature, c);
                self.sink
                    .publish(&self.profile.name, Characteristic::Temperature(c));
            } else {
                tracing::warn!(sensor = %self.profile.name, "ignoring non-finite temperature");
            }
        }
        if let Some(rh) = reading.humidity {
            if rh.is_finite() {
                self.services.insert(SensorService::Humidity, rh);
                self.sink
                    .publish(&self.profile.name, Characteristic::Humidity(rh));
            } else {
                tracing::warn!(sensor = %self.profile.name, "ignoring non-finite humidity");
            }
        }
    }
}

impl core::fmt::Debug for WeatherSensorAccessory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeatherSensorAccessory")
            .field("name", &self.profile.name)
            .field("services", &self.services)
            .finish()
    }
}
