//! On/off accessory for the lighting-style families.

use rfx_traits::{Address, Command, Family};

use crate::config::SwitchProfile;
use crate::dispatch::{CommandDispatcher, SharedRadio};
use crate::error::{Result, RfxError};
use crate::sink::{Characteristic, StateSink};

pub struct SwitchAccessory {
    profile: SwitchProfile,
    dispatcher: CommandDispatcher,
    sink: Box<dyn StateSink>,
    on: bool,
}

impl SwitchAccessory {
    /// Fails with `RfxError::UnknownDeviceType` when the family name is not
    /// one the transceiver knows, or `RfxError::NotSwitchable` for families
    /// without on/off commands.
    pub fn new(profile: SwitchProfile, radio: SharedRadio, sink: Box<dyn StateSink>) -> Result<Self> {
        let family: Family = profile
            .kind
            .parse()
            .map_err(|e: rfx_traits::UnknownFamily| eyre::Report::new(RfxError::UnknownDeviceType(e.0)))?;
        if !family.is_switchable() {
            return Err(eyre::Report::new(RfxError::NotSwitchable(
                profile.kind.clone(),
            )));
        }
        let address = Address {
            family,
            subtype: profile.subtype.clone(),
            id: profile.id.clone(),
        };
        Ok(Self {
            dispatcher: CommandDispatcher::new(radio, address),
            profile,
            sink,
            on: false,
        })
    }

    pub fn profile(&self) -> &SwitchProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Send on/off and mirror it locally once the radio accepted the frame.
    pub fn set_on(&mut self, on: bool) -> Result<()> {
        let command = if on {
            Command::SwitchOn
        } else {
            Command::SwitchOff
        };
        self.dispatcher.send(command)?;
        self.on = on;
        self.sink.publish(&self.profile.name, Characteristic::On(on));
        Ok(())
    }

    pub fn on_ready(&mut self) {
        if !self.profile.force_off_at_startup {
            return;
        }
        tracing::info!(switch = %self.profile.name, "switching off at startup");
        if let Err(e) = self.dispatcher.send(Command::SwitchOff) {
            tracing::warn!(switch = %self.profile.name, error = %e, "startup switch-off failed");
        }
    }
}

impl core::fmt::Debug for SwitchAccessory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SwitchAccessory")
            .field("name", &self.profile.name)
            .field("address", self.dispatcher.address())
            .field("on", &self.on)
            .finish()
    }
}
