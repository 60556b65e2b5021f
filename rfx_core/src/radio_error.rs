//! Maps `Box<dyn Error>` from the `Radio` boundary to typed `RfxError`.
//!
//! `rfx_traits::Radio` returns `Box<dyn Error + Send + Sync>` so drivers stay
//! independent of this crate; this module converts those to our typed error
//! enum, with a feature-gated path for `rfx_hardware::error::RadioError`.

use rfx_traits::Command;

use crate::error::RfxError;

/// Map a transport failure for `command` sent to `device` to a typed `RfxError`.
///
/// Attempts to downcast known driver error types first, then falls back
/// to string-based heuristics.
pub fn map_radio_error(
    e: &(dyn std::error::Error + 'static),
    device: &str,
    command: Command,
) -> RfxError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(radio) = e.downcast_ref::<rfx_hardware::error::RadioError>() {
            return match radio {
                rfx_hardware::error::RadioError::NotReady => RfxError::NotReady {
                    device: device.to_string(),
                    command: command.as_str(),
                },
                other => RfxError::Transport {
                    device: device.to_string(),
                    command: command.as_str(),
                    reason: other.to_string(),
                },
            };
        }
    }

    // Fallback: string-based detection
    let reason = e.to_string();
    if reason.to_lowercase().contains("not ready") {
        RfxError::NotReady {
            device: device.to_string(),
            command: command.as_str(),
        }
    } else {
        RfxError::Transport {
            device: device.to_string(),
            command: command.as_str(),
            reason,
        }
    }
}
