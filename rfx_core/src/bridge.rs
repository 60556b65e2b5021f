//! Accessory registry and command routing.
//!
//! The bridge owns one accessory per configured device and hands out work by
//! accessory name (device ids are accepted as a fallback, which is how
//! receiver events find their sensor). Every cover gets its own scheduler so
//! that cancelling one cover's stop can never touch another's.

use std::collections::HashMap;
use std::time::Instant;

use rfx_traits::{Clock, ClockScheduler, MonotonicClock, Scheduler};

use crate::cover::CoverController;
use crate::device::Device;
use crate::dispatch::SharedRadio;
use crate::error::{Result, RfxError};
use crate::sink::{StateSink, TracingSink};
use crate::switch::SwitchAccessory;
use crate::weather::{WeatherReading, WeatherSensorAccessory};

#[derive(Debug)]
pub enum Accessory {
    Cover(CoverController),
    Switch(SwitchAccessory),
    WeatherSensor(WeatherSensorAccessory),
}

impl Accessory {
    pub fn name(&self) -> &str {
        match self {
            Accessory::Cover(c) => c.name(),
            Accessory::Switch(s) => s.name(),
            Accessory::WeatherSensor(w) => w.name(),
        }
    }
}

type SchedulerFactory = Box<dyn Fn() -> Box<dyn Scheduler>>;
type SinkFactory = Box<dyn Fn() -> Box<dyn StateSink>>;

pub struct Bridge {
    radio: SharedRadio,
    clock: Box<dyn Clock>,
    make_scheduler: SchedulerFactory,
    make_sink: SinkFactory,
    devices: Vec<Device>,
    accessories: Vec<Accessory>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    ready: bool,
}

impl Bridge {
    /// Empty bridge with wall-clock timers and log-only sinks.
    pub fn new(radio: SharedRadio) -> Self {
        Self {
            radio,
            clock: Box::new(MonotonicClock::new()),
            make_scheduler: Box::new(|| -> Box<dyn Scheduler> {
                Box::new(ClockScheduler::new(MonotonicClock::new()))
            }),
            make_sink: Box::new(|| -> Box<dyn StateSink> { Box::new(TracingSink) }),
            devices: Vec::new(),
            accessories: Vec::new(),
            by_name: HashMap::new(),
            by_id: HashMap::new(),
            ready: false,
        }
    }

    /// Drive cover timers from `clock` instead of the wall clock. Affects
    /// accessories registered afterwards; `now()` and `wait_until()` follow
    /// the same clock.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Clone + 'static,
    {
        self.clock = Box::new(clock.clone());
        self.make_scheduler = Box::new(move || -> Box<dyn Scheduler> {
            Box::new(ClockScheduler::new(clock.clone()))
        });
        self
    }

    /// Sink given to each accessory registered afterwards.
    pub fn with_sink_factory<F>(mut self, make: F) -> Self
    where
        F: Fn() -> Box<dyn StateSink> + 'static,
    {
        self.make_sink = Box::new(make);
        self
    }

    /// Build and register the accessory for `device`.
    pub fn register(&mut self, device: Device) -> Result<()> {
        if self.by_name.contains_key(device.name()) {
            return Err(eyre::Report::new(RfxError::DuplicateAccessory(
                device.name().to_string(),
            )));
        }
        let accessory = match &device {
            Device::Rfy(p) => Accessory::Cover(CoverController::new(
                p.clone(),
                self.radio.clone(),
                (self.make_scheduler)(),
                (self.make_sink)(),
            )?),
            Device::Switch(p) => Accessory::Switch(SwitchAccessory::new(
                p.clone(),
                self.radio.clone(),
                (self.make_sink)(),
            )?),
            Device::WeatherSensor(p) => Accessory::WeatherSensor(WeatherSensorAccessory::new(
                p.clone(),
                (self.make_sink)(),
            )),
        };
        let idx = self.accessories.len();
        tracing::info!(
            kind = device.kind(),
            name = device.name(),
            id = device.id(),
            uuid = %device.uuid(),
            "registered accessory"
        );
        self.by_name.insert(device.name().to_string(), idx);
        self.by_id.entry(device.id().to_string()).or_insert(idx);
        self.devices.push(device);
        self.accessories.push(accessory);
        Ok(())
    }

    /// Register every device, stopping at the first failure.
    pub fn register_all(&mut self, devices: impl IntoIterator<Item = Device>) -> Result<()> {
        devices.into_iter().try_for_each(|d| self.register(d))
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn index_of(&self, key: &str) -> Result<usize> {
        self.by_name
            .get(key)
            .or_else(|| self.by_id.get(key))
            .copied()
            .ok_or_else(|| eyre::Report::new(RfxError::UnknownAccessory(key.to_string())))
    }

    pub fn accessory(&self, key: &str) -> Result<&Accessory> {
        let idx = self.index_of(key)?;
        Ok(&self.accessories[idx])
    }

    fn accessory_mut(&mut self, key: &str) -> Result<&mut Accessory> {
        let idx = self.index_of(key)?;
        Ok(&mut self.accessories[idx])
    }

    pub fn cover(&self, key: &str) -> Result<&CoverController> {
        match self.accessory(key)? {
            Accessory::Cover(c) => Ok(c),
            _ => Err(wrong_kind(key, "cover")),
        }
    }

    pub fn cover_mut(&mut self, key: &str) -> Result<&mut CoverController> {
        match self.accessory_mut(key)? {
            Accessory::Cover(c) => Ok(c),
            _ => Err(wrong_kind(key, "cover")),
        }
    }

    pub fn switch(&self, key: &str) -> Result<&SwitchAccessory> {
        match self.accessory(key)? {
            Accessory::Switch(s) => Ok(s),
            _ => Err(wrong_kind(key, "switch")),
        }
    }

    pub fn weather_sensor(&self, key: &str) -> Result<&WeatherSensorAccessory> {
        match self.accessory(key)? {
            Accessory::WeatherSensor(w) => Ok(w),
            _ => Err(wrong_kind(key, "weather sensor")),
        }
    }

    pub fn set_target_position(&mut self, key: &str, value: f64) -> Result<()> {
        self.cover_mut(key)?.set_target_position(value)
    }

    pub fn set_switch(&mut self, key: &str, on: bool) -> Result<()> {
        match self.accessory_mut(key)? {
            Accessory::Switch(s) => s.set_on(on),
            _ => Err(wrong_kind(key, "switch")),
        }
    }

    pub fn apply_reading(&mut self, key: &str, reading: &WeatherReading) -> Result<()> {
        match self.accessory_mut(key)? {
            Accessory::WeatherSensor(w) => {
                w.apply(reading);
                Ok(())
            }
            _ => Err(wrong_kind(key, "weather sensor")),
        }
    }

    /// Transceiver finished initialising. Runs the startup actions once.
    pub fn on_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        tracing::info!(accessories = self.accessories.len(), "transceiver ready");
        for accessory in &mut self.accessories {
            match accessory {
                Accessory::Cover(c) => c.on_ready(),
                Accessory::Switch(s) => s.on_ready(),
                Accessory::WeatherSensor(_) => {}
            }
        }
    }

    /// Deliver expired timers on every cover. Returns stops issued.
    pub fn tick(&mut self) -> usize {
        self.covers_mut().map(CoverController::tick).sum()
    }

    /// Current time on the clock that drives cover timers.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Let the timer clock reach `deadline`. Blocks on the wall clock,
    /// advances a virtual one.
    pub fn wait_until(&self, deadline: Instant) {
        self.clock
            .sleep(deadline.saturating_duration_since(self.clock.now()));
    }

    /// Earliest pending stop across all covers, on the timer clock.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.accessories
            .iter()
            .filter_map(|a| match a {
                Accessory::Cover(c) => c.next_deadline(),
                _ => None,
            })
            .min()
    }

    /// Cancel every pending stop without sending anything.
    pub fn cleanup(&mut self) {
        self.covers_mut().for_each(CoverController::cleanup);
    }

    fn covers_mut(&mut self) -> impl Iterator<Item = &mut CoverController> {
        self.accessories.iter_mut().filter_map(|a| match a {
            Accessory::Cover(c) => Some(c),
            _ => None,
        })
    }
}

fn wrong_kind(name: &str, expected: &'static str) -> eyre::Report {
    eyre::Report::new(RfxError::WrongKind {
        name: name.to_string(),
        expected,
    })
}
