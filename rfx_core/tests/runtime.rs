use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use rfx_core::error::RfxError;
use rfx_core::mocks::SpyRadio;
use rfx_core::runtime::{self, Request, Response};
use rfx_core::{Bridge, Device, MotionState, RfyProfile, SwitchProfile};
use rfx_traits::{Command, ManualClock};

fn bridge(radio: &SpyRadio, open_s: f64, close_s: f64) -> Bridge {
    let mut bridge = Bridge::new(Arc::new(radio.clone()));
    bridge
        .register_all([
            Device::Rfy(RfyProfile::new("0x01/1", "Blind", open_s, close_s)),
            Device::Switch(SwitchProfile::new("0x02/1", "Lamp", "Lighting2", "AC")),
        ])
        .unwrap();
    bridge
}

fn virtual_bridge(radio: &SpyRadio, clock: &ManualClock, travel_s: f64) -> Bridge {
    let mut bridge = Bridge::new(Arc::new(radio.clone())).with_clock(clock.clone());
    bridge
        .register(Device::Rfy(RfyProfile::new("0x01/1", "Blind", travel_s, travel_s)))
        .unwrap();
    bridge
}

#[test]
fn disconnect_waits_for_pending_stop() {
    let radio = SpyRadio::new();
    let mut bridge = bridge(&radio, 0.2, 0.2); // 50% = 100 ms
    let (tx, rx) = unbounded();
    tx.send(Request::Ready).unwrap();
    tx.send(Request::SetTarget {
        name: "Blind".into(),
        position: 50.0,
    })
    .unwrap();
    tx.send(Request::Query {
        name: "Blind".into(),
    })
    .unwrap();
    drop(tx);

    let mut responses = Vec::new();
    let started = Instant::now();
    let summary = runtime::run(&mut bridge, &rx, |_, r| responses.push(r));

    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(summary.requests, 2);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.stops_sent, 1);
    assert_eq!(radio.commands(), vec![Command::Up, Command::Stop]);
    match &responses[1] {
        Response::Cover(s) => {
            assert_eq!(s.current, 50.0);
            assert_eq!(s.motion, MotionState::Increasing);
        }
        other => panic!("unexpected response {other:?}"),
    }
    assert_eq!(
        bridge.cover("Blind").unwrap().motion_state(),
        MotionState::Stopped
    );
}

#[test]
fn shutdown_cancels_without_sending_stop() {
    let radio = SpyRadio::new();
    let mut bridge = bridge(&radio, 60.0, 60.0);
    let (tx, rx) = unbounded();
    tx.send(Request::SetTarget {
        name: "Blind".into(),
        position: 50.0,
    })
    .unwrap();
    tx.send(Request::Shutdown).unwrap();

    let started = Instant::now();
    let summary = runtime::run(&mut bridge, &rx, |_, _| {});
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.stops_sent, 0);
    assert_eq!(radio.commands(), vec![Command::Up]);
    assert!(!bridge.cover("Blind").unwrap().has_pending_stop());
}

#[test]
fn failures_are_reported_and_counted() {
    let radio = SpyRadio::new();
    let mut bridge = bridge(&radio, 1.0, 1.0);
    let (tx, rx) = unbounded();
    for req in [
        Request::SetTarget {
            name: "Nope".into(),
            position: 10.0,
        },
        Request::SetTarget {
            name: "Blind".into(),
            position: 150.0,
        },
        Request::SetSwitch {
            name: "Lamp".into(),
            on: true,
        },
        Request::Query {
            name: "Lamp".into(),
        },
        Request::Shutdown,
    ] {
        tx.send(req).unwrap();
    }

    let mut responses = Vec::new();
    let summary = runtime::run(&mut bridge, &rx, |_, r| responses.push(r));
    assert_eq!(summary.requests, 4);
    assert_eq!(summary.failures, 2);
    assert_eq!(
        responses,
        vec![
            Response::Failed(RfxError::UnknownAccessory("Nope".into())),
            Response::Failed(RfxError::InvalidTarget(150.0)),
            Response::Done,
            Response::Switch(true),
        ]
    );
}

#[test]
fn end_of_input_drains_while_other_senders_live() {
    let radio = SpyRadio::new();
    let mut bridge = bridge(&radio, 0.1, 0.1); // 30% = 30 ms
    let (tx, rx) = unbounded();
    let _signal_handler = tx.clone();
    tx.send(Request::SetTarget {
        name: "Blind".into(),
        position: 30.0,
    })
    .unwrap();
    tx.send(Request::EndOfInput).unwrap();

    let summary = runtime::run(&mut bridge, &rx, |_, _| {});
    assert_eq!(summary.stops_sent, 1);
    assert_eq!(radio.commands(), vec![Command::Up, Command::Stop]);
}

#[test]
fn virtual_clock_drains_without_wall_wait() {
    let radio = SpyRadio::new();
    let clock = ManualClock::new();
    let mut bridge = virtual_bridge(&radio, &clock, 60.0); // 50% = 30 s
    let (tx, rx) = unbounded();
    tx.send(Request::Ready).unwrap();
    tx.send(Request::SetTarget {
        name: "Blind".into(),
        position: 50.0,
    })
    .unwrap();
    drop(tx);

    let started = Instant::now();
    let summary = runtime::run(&mut bridge, &rx, |_, _| {});
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(clock.elapsed(), Duration::from_secs(30));
    assert_eq!(summary.stops_sent, 1);
    assert_eq!(radio.commands(), vec![Command::Up, Command::Stop]);
    assert_eq!(
        bridge.cover("Blind").unwrap().motion_state(),
        MotionState::Stopped
    );
}

#[test]
fn virtual_clock_advances_when_idle_sender_stays_open() {
    let radio = SpyRadio::new();
    let clock = ManualClock::new();
    let mut bridge = virtual_bridge(&radio, &clock, 0.2); // 50% = 100 ms
    let (tx, rx) = unbounded();
    tx.send(Request::SetTarget {
        name: "Blind".into(),
        position: 50.0,
    })
    .unwrap();
    tx.send(Request::EndOfInput).unwrap();

    let started = Instant::now();
    let summary = runtime::run(&mut bridge, &rx, |_, _| {});
    drop(tx);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(clock.elapsed(), Duration::from_millis(100));
    assert_eq!(summary.stops_sent, 1);
    assert_eq!(radio.commands(), vec![Command::Up, Command::Stop]);
}
