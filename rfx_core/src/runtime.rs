//! Single-threaded event loop around a `Bridge`.
//!
//! Requests arrive over a crossbeam channel from any number of producers
//! (stdin reader, signal handler, receiver thread). The loop sleeps until
//! either a request arrives or the earliest cover stop is due, so all
//! accessory state is touched from this one thread.
//!
//! Stop deadlines are measured on the bridge's clock. With a virtual clock
//! the loop advances it to each deadline once no request is waiting.

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::bridge::{Accessory, Bridge};
use crate::error::RfxError;
use crate::state::CoverSnapshot;
use crate::weather::{SensorService, WeatherReading};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    SetTarget { name: String, position: f64 },
    SetSwitch { name: String, on: bool },
    Reading { name: String, reading: WeatherReading },
    Query { name: String },
    /// Transceiver finished initialising.
    Ready,
    /// No more requests will follow; exit once pending stops have fired.
    EndOfInput,
    /// Stop immediately; pending stops are cancelled, not sent.
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Done,
    Cover(CoverSnapshot),
    Switch(bool),
    Sensor(Vec<(SensorService, f64)>),
    Failed(RfxError),
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: usize,
    pub failures: usize,
    pub stops_sent: usize,
}

/// Serve `requests` until `Shutdown`, or until input has ended and no
/// cover stop is pending.
///
/// Input ends on `EndOfInput` or when every sender is gone. Requests that
/// still arrive while pending stops run out are served normally. `respond`
/// is called once per request other than `Ready`, `EndOfInput` and
/// `Shutdown`.
pub fn run<F>(bridge: &mut Bridge, requests: &Receiver<Request>, mut respond: F) -> RunSummary
where
    F: FnMut(&Request, Response),
{
    let mut summary = RunSummary::default();
    let mut draining = false;
    loop {
        summary.stops_sent += bridge.tick();

        let deadline = bridge.next_deadline();
        if draining && deadline.is_none() {
            break;
        }
        let received = match deadline {
            Some(deadline) => {
                requests.recv_timeout(deadline.saturating_duration_since(bridge.now()))
            }
            None => requests
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };
        let request = match received {
            Ok(request) => request,
            Err(e) => {
                if e.is_disconnected() {
                    draining = true;
                }
                // Deadlines live on the bridge's clock, which may be virtual.
                if let Some(deadline) = deadline {
                    bridge.wait_until(deadline);
                }
                continue;
            }
        };

        match request {
            Request::Shutdown => {
                tracing::info!("shutdown requested");
                break;
            }
            Request::EndOfInput => {
                tracing::debug!("end of input; waiting for pending stops");
                draining = true;
            }
            Request::Ready => bridge.on_ready(),
            req => {
                summary.requests += 1;
                let response = handle(bridge, &req);
                if matches!(response, Response::Failed(_)) {
                    summary.failures += 1;
                }
                respond(&req, response);
            }
        }
    }
    bridge.cleanup();
    tracing::info!(
        requests = summary.requests,
        failures = summary.failures,
        stops = summary.stops_sent,
        "runtime stopped"
    );
    summary
}

/// Apply one request to the bridge.
pub fn handle(bridge: &mut Bridge, request: &Request) -> Response {
    let outcome = match request {
        Request::SetTarget { name, position } => bridge
            .set_target_position(name, *position)
            .map(|()| Response::Done),
        Request::SetSwitch { name, on } => bridge.set_switch(name, *on).map(|()| Response::Done),
        Request::Reading { name, reading } => {
            bridge.apply_reading(name, reading).map(|()| Response::Done)
        }
        Request::Query { name } => bridge.accessory(name).map(|a| match a {
            Accessory::Cover(c) => Response::Cover(c.snapshot()),
            Accessory::Switch(s) => Response::Switch(s.is_on()),
            Accessory::WeatherSensor(w) => Response::Sensor(w.services().collect()),
        }),
        Request::Ready | Request::EndOfInput | Request::Shutdown => Ok(Response::Done),
    };
    outcome.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "request failed");
        Response::Failed(RfxError::from_report(&e))
    })
}
