use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RfxError {
    #[error("target position {0} is outside [0, 100]")]
    InvalidTarget(f64),
    #[error("transport error sending '{command}' to {device}: {reason}")]
    Transport {
        device: String,
        command: &'static str,
        reason: String,
    },
    #[error("transceiver not ready while sending '{command}' to {device}")]
    NotReady {
        device: String,
        command: &'static str,
    },
    #[error("device type '{0}' is unknown")]
    UnknownDeviceType(String),
    #[error("device type '{0}' cannot be switched on or off")]
    NotSwitchable(String),
    #[error("unknown accessory '{0}'")]
    UnknownAccessory(String),
    #[error("accessory '{name}' is not a {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
    },
    #[error("accessory '{0}' is already registered")]
    DuplicateAccessory(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RfxError {
    /// Recover the typed error from a report, keeping foreign errors as text.
    pub fn from_report(report: &eyre::Report) -> Self {
        report
            .downcast_ref::<RfxError>()
            .cloned()
            .unwrap_or_else(|| RfxError::Internal(format!("{report:#}")))
    }
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing device profile")]
    MissingProfile,
    #[error("missing radio")]
    MissingRadio,
    #[error("invalid profile: {0}")]
    InvalidProfile(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
