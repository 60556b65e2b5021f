//! `rfx run`: line-oriented front end for the bridge runtime.
//!
//! Each stdin line becomes one `Request`:
//!
//! ```text
//! set <name> <position>
//! get <name>
//! switch <name> on|off
//! sensor <name> battery=90 temperature=21.5 humidity=40
//! quit
//! ```
//!
//! Names may contain spaces; the last word of `set`/`switch` is the value.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Sender, unbounded};
use rfx_core::error::Result;
use rfx_core::runtime::{self, Request, Response};
use rfx_core::{Bridge, WeatherReading, devices_from_config};
use rfx_hardware::SimulatedRadio;
use rfx_traits::Radio;
use serde_json::json;

use crate::error_fmt::rfx_reason;

fn split_last(rest: &[&str]) -> Option<(String, String)> {
    let (value, name) = rest.split_last()?;
    if name.is_empty() {
        return None;
    }
    Some((name.join(" "), (*value).to_string()))
}

fn field<T: std::str::FromStr>(key: &str, value: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("bad value for {key}: '{value}'"))
}

fn parse_reading(pairs: &[&str]) -> std::result::Result<WeatherReading, String> {
    let mut reading = WeatherReading::default();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
        match key {
            "battery" => reading.battery_level = Some(field(key, value)?),
            "temperature" => reading.temperature = Some(field(key, value)?),
            "humidity" => reading.humidity = Some(field(key, value)?),
            other => return Err(format!("unknown sensor field '{other}'")),
        }
    }
    Ok(reading)
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> std::result::Result<Option<Request>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let (verb, rest) = words
        .split_first()
        .ok_or_else(|| "empty command".to_string())?;
    let request = match *verb {
        "quit" | "exit" => Request::Shutdown,
        "get" if !rest.is_empty() => Request::Query {
            name: rest.join(" "),
        },
        "set" => {
            let (name, value) =
                split_last(rest).ok_or_else(|| "usage: set <name> <position>".to_string())?;
            let position = value
                .parse::<f64>()
                .map_err(|_| format!("position must be a number, got '{value}'"))?;
            Request::SetTarget { name, position }
        }
        "switch" => {
            let (name, value) =
                split_last(rest).ok_or_else(|| "usage: switch <name> on|off".to_string())?;
            let on = match value.as_str() {
                "on" => true,
                "off" => false,
                other => return Err(format!("expected on|off, got '{other}'")),
            };
            Request::SetSwitch { name, on }
        }
        "sensor" => {
            let split = rest
                .iter()
                .position(|w| w.contains('='))
                .ok_or_else(|| "usage: sensor <name> key=value...".to_string())?;
            if split == 0 {
                return Err("usage: sensor <name> key=value...".to_string());
            }
            Request::Reading {
                name: rest[..split].join(" "),
                reading: parse_reading(&rest[split..])?,
            }
        }
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(request))
}

fn request_name(req: &Request) -> &str {
    match req {
        Request::SetTarget { name, .. }
        | Request::SetSwitch { name, .. }
        | Request::Reading { name, .. }
        | Request::Query { name } => name,
        Request::Ready | Request::EndOfInput | Request::Shutdown => "",
    }
}

/// One output line for a served request.
pub fn render(req: &Request, resp: &Response, json: bool) -> String {
    let name = request_name(req);
    match (resp, json) {
        (Response::Done, true) => json!({ "name": name, "ok": true }).to_string(),
        (Response::Done, false) => format!("{name}: ok"),
        (Response::Cover(s), true) => json!({
            "name": name,
            "motion": s.motion.as_str(),
            "position_state": s.motion.hap_value(),
            "target": s.target,
            "current": s.current,
        })
        .to_string(),
        (Response::Cover(s), false) => format!(
            "{name}: {} target={} current={}",
            s.motion, s.target, s.current
        ),
        (Response::Switch(on), true) => json!({ "name": name, "on": on }).to_string(),
        (Response::Switch(on), false) => format!("{name}: {}", if *on { "on" } else { "off" }),
        (Response::Sensor(values), true) => {
            let mut obj = serde_json::Map::new();
            obj.insert("name".into(), json!(name));
            for (service, value) in values {
                obj.insert(service.as_str().into(), json!(value));
            }
            serde_json::Value::Object(obj).to_string()
        }
        (Response::Sensor(values), false) => {
            let fields: Vec<String> = values
                .iter()
                .map(|(service, value)| format!("{}={value}", service.as_str()))
                .collect();
            if fields.is_empty() {
                format!("{name}: no readings yet")
            } else {
                format!("{name}: {}", fields.join(" "))
            }
        }
        (Response::Failed(e), true) => json!({
            "name": name,
            "ok": false,
            "reason": rfx_reason(e),
            "error": e.to_string(),
        })
        .to_string(),
        (Response::Failed(e), false) => format!("{name}: error: {e}"),
    }
}

const READY_POLL: Duration = Duration::from_millis(20);

/// Queue `Ready` once `radio` reports it has initialised. A transceiver that
/// is already up is announced before this returns; otherwise a watcher
/// thread polls until it comes up.
pub fn announce_ready<R>(radio: Arc<R>, tx: Sender<Request>) -> Result<()>
where
    R: Radio + Send + Sync + 'static,
{
    if radio.is_ready() {
        return tx
            .send(Request::Ready)
            .map_err(|e| eyre::eyre!("runtime channel closed: {e}"));
    }
    tracing::debug!("waiting for transceiver to initialise");
    std::thread::spawn(move || {
        while !radio.is_ready() {
            std::thread::sleep(READY_POLL);
        }
        let _ = tx.send(Request::Ready);
    });
    Ok(())
}

pub fn serve(cfg: &rfx_config::Config, json: bool) -> Result<()> {
    tracing::info!(
        tty = %cfg.transport.tty,
        debug = cfg.transport.debug,
        "opening transceiver (simulated)"
    );
    let radio = Arc::new(SimulatedRadio::from_env());
    let mut bridge = Bridge::new(radio.clone());
    bridge.register_all(devices_from_config(cfg))?;
    tracing::info!(platform = %cfg.name, accessories = bridge.devices().len(), "bridge up");

    let (tx, rx) = unbounded();
    let signal_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = signal_tx.send(Request::Shutdown);
    })
    .map_err(|e| eyre::eyre!("install signal handler: {e}"))?;

    announce_ready(radio, tx.clone())?;

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Ok(Some(request)) => {
                    let stop = matches!(request, Request::Shutdown);
                    if tx.send(request).is_err() || stop {
                        return;
                    }
                }
                Ok(None) => {}
                Err(msg) => eprintln!("error: {msg}"),
            }
        }
        let _ = tx.send(Request::EndOfInput);
    });

    let summary = runtime::run(&mut bridge, &rx, |req, resp| {
        println!("{}", render(req, &resp, json));
    });
    tracing::debug!(?summary, "run finished");
    Ok(())
}
