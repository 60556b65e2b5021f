#![allow(dead_code)]

use rfx_core::mocks::{RecordingSink, SpyRadio};
use rfx_core::{CoverController, RfyProfile};
use rfx_traits::{ClockScheduler, ManualClock};

pub const COVER_ID: &str = "0x010203/1";

pub struct Rig {
    pub cover: CoverController,
    pub radio: SpyRadio,
    pub clock: ManualClock,
    pub sink: RecordingSink,
}

pub fn rig_with(profile: RfyProfile) -> Rig {
    let radio = SpyRadio::new();
    let clock = ManualClock::new();
    let sink = RecordingSink::new();
    let cover = CoverController::builder()
        .with_profile(profile)
        .with_radio(radio.clone())
        .with_scheduler(ClockScheduler::new(clock.clone()))
        .with_sink(sink.clone())
        .build()
        .expect("valid profile");
    Rig {
        cover,
        radio,
        clock,
        sink,
    }
}

pub fn rig(open_s: f64, close_s: f64, reversed: bool) -> Rig {
    rig_with(RfyProfile::new(COVER_ID, "Living room", open_s, close_s).reversed(reversed))
}
