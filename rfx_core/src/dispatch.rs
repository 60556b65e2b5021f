//! Thin wrapper that sends one command to one fixed address.

use std::sync::Arc;

use rfx_traits::{Address, Command, Radio};

use crate::error::Result;
use crate::radio_error::map_radio_error;

/// Shared transport handle used by every accessory.
pub type SharedRadio = Arc<dyn Radio + Send + Sync>;

pub struct CommandDispatcher {
    radio: SharedRadio,
    address: Address,
}

impl CommandDispatcher {
    pub fn new(radio: SharedRadio, address: Address) -> Self {
        Self { radio, address }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Fire-and-forget send. Transport failures come back as `RfxError`
    /// (`Transport` or `NotReady`) wrapped in the report.
    pub fn send(&self, command: Command) -> Result<()> {
        tracing::debug!(address = %self.address, %command, "dispatch");
        self.radio.send(&self.address, command).map_err(|e| {
            eyre::Report::new(map_radio_error(&*e, &self.address.id, command))
        })
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
