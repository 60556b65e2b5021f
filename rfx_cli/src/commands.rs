//! One-shot subcommands: `check`, `plan` and `simulate`.

use std::sync::Arc;
use std::time::Duration;

use rfx_core::error::{Result, RfxError};
use rfx_core::{
    Bridge, Characteristic, CoverController, CoverSnapshot, Device, RfyProfile, StateSink,
    devices_from_config,
};
use rfx_hardware::SimulatedRadio;
use rfx_traits::{Address, BoxError, ClockScheduler, Command, ManualClock, Radio};
use serde_json::json;

/// Register every configured device on a simulated transceiver and list them.
pub fn check(cfg: &rfx_config::Config, json: bool) -> Result<()> {
    let mut bridge = Bridge::new(Arc::new(SimulatedRadio::new()));
    bridge.register_all(devices_from_config(cfg))?;
    for d in bridge.devices() {
        if json {
            println!(
                "{}",
                json!({ "kind": d.kind(), "name": d.name(), "id": d.id(), "uuid": d.uuid().to_string() })
            );
        } else {
            println!("{:<20} {:<24} {:<16} {}", d.kind(), d.name(), d.id(), d.uuid());
        }
    }
    let n = bridge.devices().len();
    if json {
        println!("{}", json!({ "ok": true, "platform": cfg.name, "accessories": n }));
    } else {
        println!("config OK: {n} accessories ({})", cfg.name);
    }
    Ok(())
}

/// Cover profile for `key` (name first, then device id).
pub fn find_cover(cfg: &rfx_config::Config, key: &str) -> Result<RfyProfile> {
    let devices = devices_from_config(cfg);
    let device = devices
        .iter()
        .find(|d| d.name() == key)
        .or_else(|| devices.iter().find(|d| d.id() == key))
        .cloned()
        .ok_or_else(|| eyre::Report::new(RfxError::UnknownAccessory(key.to_string())))?;
    match device {
        Device::Rfy(profile) => Ok(profile),
        _ => Err(eyre::Report::new(RfxError::WrongKind {
            name: key.to_string(),
            expected: "cover",
        })),
    }
}

fn check_position(value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(eyre::Report::new(RfxError::InvalidTarget(value)))
    }
}

#[allow(clippy::float_cmp)]
pub fn plan(cfg: &rfx_config::Config, device: &str, from: f64, to: f64, json: bool) -> Result<()> {
    let profile = find_cover(cfg, device)?;
    check_position(from)?;
    check_position(to)?;

    if from == to {
        if json {
            println!(
                "{}",
                json!({ "device": profile.name, "from": from, "to": to, "command": null, "travel_ms": 0, "motion": "stopped", "stop": false })
            );
        } else {
            println!("{}: already at {to}, nothing to send", profile.name);
        }
        return Ok(());
    }

    let p = rfx_core::plan(
        from,
        to,
        profile.reversed,
        profile.open_duration_s,
        profile.close_duration_s,
    );
    let travel_ms = p.travel_time(from, to).as_millis() as u64;
    let timed = to > 0.0 && to < 100.0;
    if json {
        println!(
            "{}",
            json!({
                "device": profile.name,
                "from": from,
                "to": to,
                "command": p.command.as_str(),
                "travel_ms": travel_ms,
                "motion": p.motion().as_str(),
                "stop": timed,
            })
        );
    } else if timed {
        println!(
            "{}: {} for {travel_ms} ms ({}), then stop",
            profile.name,
            p.command,
            p.motion()
        );
    } else {
        println!(
            "{}: {} until the end stop (about {travel_ms} ms, {})",
            profile.name,
            p.command,
            p.motion()
        );
    }
    Ok(())
}

/// Prints trace events stamped with virtual time.
#[derive(Clone)]
struct Trace {
    clock: ManualClock,
    json: bool,
}

impl Trace {
    fn t_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn command(&self, address: &Address, command: Command) {
        if self.json {
            println!(
                "{}",
                json!({ "t_ms": self.t_ms(), "event": "command", "device": address.id, "command": command.as_str() })
            );
        } else {
            println!("{:>9} ms  {} <- {command}", self.t_ms(), address.id);
        }
    }

    fn state(&self, name: &str, s: &CoverSnapshot) {
        if self.json {
            println!(
                "{}",
                json!({
                    "t_ms": self.t_ms(),
                    "event": "state",
                    "name": name,
                    "motion": s.motion.as_str(),
                    "position_state": s.motion.hap_value(),
                    "target": s.target,
                    "current": s.current,
                })
            );
        } else {
            println!(
                "{:>9} ms  {name}: {} target={} current={}",
                self.t_ms(),
                s.motion,
                s.target,
                s.current
            );
        }
    }
}

/// Simulated transceiver that also prints what it sends.
struct TracedRadio {
    inner: SimulatedRadio,
    trace: Trace,
}

impl Radio for TracedRadio {
    fn send(&self, address: &Address, command: Command) -> std::result::Result<(), BoxError> {
        self.inner.send(address, command)?;
        self.trace.command(address, command);
        Ok(())
    }
}

struct TraceSink(Trace);

impl StateSink for TraceSink {
    fn publish(&mut self, accessory: &str, update: Characteristic) {
        if let Characteristic::Cover(s) = update {
            self.0.state(accessory, &s);
        }
    }
}

/// Advance virtual time by `span`, stopping at each due timer on the way.
fn advance(clock: &ManualClock, cover: &mut CoverController, mut span: Duration) {
    loop {
        let wait = cover
            .next_deadline()
            .map(|d| d.saturating_duration_since(rfx_traits::Clock::now(clock)));
        match wait {
            Some(wait) if wait <= span => {
                clock.advance(wait);
                span -= wait;
                cover.tick();
            }
            _ => {
                clock.advance(span);
                cover.tick();
                return;
            }
        }
    }
}

/// Let every pending stop fire.
fn run_out(clock: &ManualClock, cover: &mut CoverController) {
    while let Some(deadline) = cover.next_deadline() {
        clock.advance(deadline.saturating_duration_since(rfx_traits::Clock::now(clock)));
        cover.tick();
    }
}

pub fn simulate(
    cfg: &rfx_config::Config,
    device: &str,
    targets: &[f64],
    step_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let profile = find_cover(cfg, device)?;
    let clock = ManualClock::new();
    let trace = Trace {
        clock: clock.clone(),
        json,
    };
    let radio = TracedRadio {
        inner: SimulatedRadio::from_env(),
        trace: trace.clone(),
    };
    let mut cover = CoverController::builder()
        .with_profile(profile)
        .with_radio(radio)
        .with_scheduler(ClockScheduler::new(clock.clone()))
        .with_sink(TraceSink(trace.clone()))
        .build()?;

    tracing::info!(cover = cover.name(), targets = targets.len(), "simulating");
    for &target in targets {
        cover.set_target_position(target)?;
        match step_ms {
            Some(ms) => advance(&clock, &mut cover, Duration::from_millis(ms)),
            None => run_out(&clock, &mut cover),
        }
    }
    run_out(&clock, &mut cover);

    let s = cover.snapshot();
    if json {
        println!(
            "{}",
            json!({ "t_ms": trace.t_ms(), "event": "done", "motion": s.motion.as_str(), "current": s.current })
        );
    } else {
        println!(
            "{:>9} ms  done: {} at {}",
            trace.t_ms(),
            s.motion,
            s.current
        );
    }
    Ok(())
}
