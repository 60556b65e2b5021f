//! Test and helper mocks for rfx_core

use std::sync::{Arc, Mutex};

use rfx_traits::{Address, BoxError, Command, Radio};

use crate::sink::{Characteristic, StateSink};

/// Sink that keeps every update. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<(String, Characteristic)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(String, Characteristic)> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.log.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Characteristic> {
        self.log
            .lock()
            .ok()
            .and_then(|l| l.last().map(|(_, c)| *c))
    }
}

impl StateSink for RecordingSink {
    fn publish(&mut self, accessory: &str, update: Characteristic) {
        if let Ok(mut log) = self.log.lock() {
            log.push((accessory.to_string(), update));
        }
    }
}

/// Radio that records what it is asked to send and can be told to fail.
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SpyRadio {
    sent: Arc<Mutex<Vec<(String, Command)>>>,
    failing: Arc<Mutex<Option<String>>>,
}

impl SpyRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail with `reason`; `None` restores normal sends.
    pub fn fail_with(&self, reason: Option<&str>) {
        if let Ok(mut f) = self.failing.lock() {
            *f = reason.map(str::to_string);
        }
    }

    pub fn sent(&self) -> Vec<(String, Command)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Commands sent so far, any device.
    pub fn commands(&self) -> Vec<Command> {
        self.sent().into_iter().map(|(_, c)| c).collect()
    }

    pub fn count(&self, command: Command) -> usize {
        self.commands().iter().filter(|c| **c == command).count()
    }

    pub fn clear(&self) {
        if let Ok(mut s) = self.sent.lock() {
            s.clear();
        }
    }
}

impl Radio for SpyRadio {
    fn send(&self, address: &Address, command: Command) -> Result<(), BoxError> {
        if let Some(reason) = self.failing.lock().ok().and_then(|f| f.clone()) {
            return Err(Box::new(std::io::Error::other(reason)));
        }
        if let Ok(mut s) = self.sent.lock() {
            s.push((address.id.clone(), command));
        }
        Ok(())
    }
}
