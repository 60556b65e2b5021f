#![no_main]
use std::time::Duration;

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use rfx_core::{CoverController, RfyProfile, mocks::SpyRadio};
use rfx_traits::{ClockScheduler, ManualClock};

#[derive(Debug, Arbitrary)]
struct Move {
    target: f64,
    wait_ms: u16,
}

#[derive(Debug, Arbitrary)]
struct Input {
    reversed: bool,
    open_ds: u8,
    close_ds: u8,
    moves: Vec<Move>,
}

fuzz_target!(|input: Input| {
    let clock = ManualClock::new();
    let profile = RfyProfile::new(
        "0x01/1",
        "Fuzz",
        f64::from(input.open_ds) / 10.0,
        f64::from(input.close_ds) / 10.0,
    )
    .reversed(input.reversed);
    let Ok(mut cover) = CoverController::builder()
        .with_profile(profile)
        .with_radio(SpyRadio::new())
        .with_scheduler(ClockScheduler::new(clock.clone()))
        .build()
    else {
        return;
    };

    for m in input.moves.iter().take(64) {
        let valid = m.target.is_finite() && (0.0..=100.0).contains(&m.target);
        let before = cover.current_position();
        match cover.set_target_position(m.target) {
            Ok(()) => assert!(valid),
            Err(_) => {
                assert!(!valid);
                assert_eq!(cover.current_position(), before);
            }
        }
        clock.advance(Duration::from_millis(u64::from(m.wait_ms)));
        cover.tick();
        assert!((0.0..=100.0).contains(&cover.current_position()));
    }
    cover.cleanup();
    assert!(!cover.has_pending_stop());
});
