pub mod error;

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use rfx_traits::{Address, BoxError, Command, Radio};

use crate::error::RadioError;

/// One transmitted command as seen by the simulated transceiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub address: Address,
    pub command: Command,
}

/// How the simulator should fail the next transmissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    NotReady,
    Io,
}

/// Simulated RFXtrx transceiver.
///
/// Records every frame it is asked to send and logs it. Sending before
/// `mark_ready()` fails with `RadioError::NotReady` unless readiness gating
/// is disabled.
pub struct SimulatedRadio {
    ready: AtomicBool,
    gate_on_ready: bool,
    fail: Mutex<Option<FailMode>>,
    frames: Mutex<Vec<Frame>>,
}

impl Default for SimulatedRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRadio {
    /// A transceiver that is already initialised.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            gate_on_ready: false,
            fail: Mutex::new(None),
            frames: Mutex::new(Vec::new()),
        }
    }

    /// A transceiver that rejects commands until `mark_ready()`.
    pub fn gated() -> Self {
        Self {
            ready: AtomicBool::new(false),
            gate_on_ready: true,
            ..Self::new()
        }
    }

    /// Build from the environment: `RFX_TEST_SIM_FAIL=1` makes every send fail.
    pub fn from_env() -> Self {
        let radio = Self::new();
        if std::env::var("RFX_TEST_SIM_FAIL").is_ok_and(|v| v == "1") {
            radio.fail_with(Some(FailMode::Io));
        }
        radio
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
        tracing::info!("RFXtrx initialized (simulated)");
    }

    pub fn fail_with(&self, mode: Option<FailMode>) {
        if let Ok(mut fail) = self.fail.lock() {
            *fail = mode;
        }
    }

    /// Frames sent so far, oldest first.
    pub fn history(&self) -> Vec<Frame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Commands sent to `id`, oldest first.
    pub fn commands_for(&self, id: &str) -> Vec<Command> {
        self.history()
            .into_iter()
            .filter(|f| f.address.id == id)
            .map(|f| f.command)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.clear();
        }
    }

    fn check(&self, address: &Address, command: Command) -> error::Result<()> {
        if self.gate_on_ready && !self.ready.load(Ordering::Acquire) {
            return Err(RadioError::NotReady);
        }
        match self.fail.lock().map(|f| *f).unwrap_or(None) {
            Some(FailMode::NotReady) => return Err(RadioError::NotReady),
            Some(FailMode::Io) => {
                return Err(RadioError::Io(std::io::Error::other(
                    "simulated transmit failure",
                )));
            }
            None => {}
        }
        if address.id.trim().is_empty() {
            return Err(RadioError::UnknownDevice(address.to_string()));
        }
        let switching = matches!(command, Command::SwitchOn | Command::SwitchOff);
        if switching != address.family.is_switchable() {
            return Err(RadioError::Rejected {
                family: address.family.as_str(),
                command: command.as_str(),
            });
        }
        Ok(())
    }
}

impl Radio for SimulatedRadio {
    fn send(&self, address: &Address, command: Command) -> Result<(), BoxError> {
        if let Err(e) = self.check(address, command) {
            tracing::error!(%address, %command, error = %e, "transmit failed (simulated)");
            return Err(Box::new(e));
        }
        tracing::info!(%address, %command, "transmit (simulated)");
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(Frame {
                address: address.clone(),
                command,
            });
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
