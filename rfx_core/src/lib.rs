#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core bridge logic (transport-agnostic).
//!
//! This crate holds the accessory model of the RFXtrx bridge. All radio
//! traffic goes through `rfx_traits::Radio`; all timing goes through
//! `rfx_traits::Scheduler`.
//!
//! ## Architecture
//!
//! - **Planning**: direction and run time of a cover move (`planner`)
//! - **Covers**: open-loop position controller with timed stop (`cover`, `builder`)
//! - **Switches / sensors**: optimistic on/off and lazy sensor services
//! - **Bridge**: registry and routing by accessory name (`bridge`)
//! - **Runtime**: channel-driven event loop (`runtime`)
//!
//! ## Positions
//!
//! Positions are `f64` percentages, 0 = closed and 100 = open. Fractional
//! targets are accepted; run times are rounded to whole milliseconds.

pub mod bridge;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod cover;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod mocks;
pub mod planner;
pub mod radio_error;
pub mod runtime;
pub mod sink;
pub mod state;
pub mod switch;
pub mod weather;

pub use bridge::{Accessory, Bridge};
pub use builder::{CoverBuilder, Missing, Set};
pub use config::{RfyProfile, SwitchProfile, WeatherSensorProfile};
pub use conversions::devices_from_config;
pub use cover::CoverController;
pub use device::Device;
pub use dispatch::{CommandDispatcher, SharedRadio};
pub use error::{BuildError, Result, RfxError};
pub use planner::{MovePlan, plan, travel_time};
pub use sink::{Characteristic, StateSink, TracingSink};
pub use state::{CoverSnapshot, MotionState};
pub use switch::SwitchAccessory;
pub use weather::{SensorService, WeatherReading, WeatherSensorAccessory};
