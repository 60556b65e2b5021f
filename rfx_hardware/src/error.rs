use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadioError {
    #[error("transceiver not ready")]
    NotReady,
    #[error("no mapping for device {0}")]
    UnknownDevice(String),
    #[error("command {command} rejected by {family} transmitter")]
    Rejected {
        family: &'static str,
        command: &'static str,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RadioError>;
