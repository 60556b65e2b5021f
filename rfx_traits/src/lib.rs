pub mod clock;
pub mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use scheduler::{ClockScheduler, Scheduler, TimerHandle};

use std::fmt;
use std::str::FromStr;

/// Error type used at the driver boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Symbolic command understood by the radio transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Raise the cover (the "increase" command).
    Up,
    /// Lower the cover (the "decrease" command).
    Down,
    Stop,
    SwitchOn,
    SwitchOff,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Down => "down",
            Command::Stop => "stop",
            Command::SwitchOn => "on",
            Command::SwitchOff => "off",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transmitter family, named after the RFXtrx packet types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Rfy,
    Lighting1,
    Lighting2,
    Lighting3,
    Lighting4,
    Lighting5,
    Lighting6,
    Chime1,
    Curtain1,
    Blinds1,
    HomeConfort,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Rfy => "Rfy",
            Family::Lighting1 => "Lighting1",
            Family::Lighting2 => "Lighting2",
            Family::Lighting3 => "Lighting3",
            Family::Lighting4 => "Lighting4",
            Family::Lighting5 => "Lighting5",
            Family::Lighting6 => "Lighting6",
            Family::Chime1 => "Chime1",
            Family::Curtain1 => "Curtain1",
            Family::Blinds1 => "Blinds1",
            Family::HomeConfort => "HomeConfort",
        }
    }

    /// Whether the family accepts `SwitchOn`/`SwitchOff`.
    pub fn is_switchable(self) -> bool {
        !matches!(self, Family::Rfy | Family::Curtain1 | Family::Blinds1)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `Family::from_str` for names the transceiver does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFamily(pub String);

impl fmt::Display for UnknownFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device type '{}' is unknown", self.0)
    }
}

impl std::error::Error for UnknownFamily {}

impl FromStr for Family {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let family = match s {
            "Rfy" => Family::Rfy,
            "Lighting1" => Family::Lighting1,
            "Lighting2" => Family::Lighting2,
            "Lighting3" => Family::Lighting3,
            "Lighting4" => Family::Lighting4,
            "Lighting5" => Family::Lighting5,
            "Lighting6" => Family::Lighting6,
            "Chime1" => Family::Chime1,
            "Curtain1" => Family::Curtain1,
            "Blinds1" => Family::Blinds1,
            "HomeConfort" => Family::HomeConfort,
            other => return Err(UnknownFamily(other.to_string())),
        };
        Ok(family)
    }
}

/// Where a command goes: family, family subtype and the unit identifier
/// (e.g. `0x123456/1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub family: Family,
    pub subtype: String,
    pub id: String,
}

impl Address {
    /// Somfy RTS address with the default `RFY` subtype.
    pub fn rfy(id: impl Into<String>) -> Self {
        Self {
            family: Family::Rfy,
            subtype: "RFY".to_string(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.family, self.subtype, self.id)
    }
}

/// Fire-and-forget radio transport. No acknowledgement is awaited.
pub trait Radio {
    fn send(&self, address: &Address, command: Command) -> Result<(), BoxError>;

    /// Whether the transceiver finished initialising.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<R: Radio + ?Sized> Radio for std::sync::Arc<R> {
    fn send(&self, address: &Address, command: Command) -> Result<(), BoxError> {
        (**self).send(address, command)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_round_trips_known_names() {
        for name in ["Rfy", "Lighting2", "Chime1", "HomeConfort"] {
            let family: Family = name.parse().unwrap();
            assert_eq!(family.as_str(), name);
        }
    }

    #[test]
    fn unknown_family_names_the_type() {
        let err = "UnknownType".parse::<Family>().unwrap_err();
        assert_eq!(err.to_string(), "device type 'UnknownType' is unknown");
    }

    #[test]
    fn command_wire_names() {
        assert_eq!(Command::Up.as_str(), "up");
        assert_eq!(Command::Down.as_str(), "down");
        assert_eq!(Command::Stop.as_str(), "stop");
        assert_eq!(Command::SwitchOn.to_string(), "on");
    }
}
