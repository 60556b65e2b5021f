//! Human-readable error descriptions and structured JSON error formatting.

use rfx_core::error::{BuildError, RfxError};

/// Stable name of an `RfxError` kind.
pub fn rfx_reason(e: &RfxError) -> &'static str {
    match e {
        RfxError::InvalidTarget(_) => "InvalidTarget",
        RfxError::Transport { .. } => "Transport",
        RfxError::NotReady { .. } => "NotReady",
        RfxError::UnknownDeviceType(_) => "UnknownDeviceType",
        RfxError::NotSwitchable(_) => "NotSwitchable",
        RfxError::UnknownAccessory(_) => "UnknownAccessory",
        RfxError::WrongKind { .. } => "WrongKind",
        RfxError::DuplicateAccessory(_) => "DuplicateAccessory",
        RfxError::Internal(_) => "Internal",
    }
}

/// Stable name of the error kind, used as `reason` in JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(e) = err.downcast_ref::<RfxError>() {
        return rfx_reason(e);
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidProfile";
    }
    "Error"
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingProfile | BuildError::MissingRadio => format!(
                "What happened: A cover could not be assembled ({be}).\nLikely causes: Internal wiring error in the bridge.\nHow to fix: Re-run with --log-level=debug and report the output."
            ),
            BuildError::InvalidProfile(msg) => format!(
                "What happened: Invalid cover settings ({msg}).\nLikely causes: Missing or out-of-range values under [[devices.rfy]].\nHow to fix: Edit the config file, then run `rfx check`."
            ),
        };
    }

    if let Some(re) = err.downcast_ref::<RfxError>() {
        return match re {
            RfxError::InvalidTarget(v) => format!(
                "What happened: Position {v} is not a valid target.\nLikely causes: Value outside 0..=100 or not a number.\nHow to fix: Use 0 for closed, 100 for open, or anything in between."
            ),
            RfxError::Transport { device, command, reason } => format!(
                "What happened: Sending '{command}' to {device} failed: {reason}.\nLikely causes: Transceiver unplugged, wrong transport.tty, or serial port busy.\nHow to fix: Check the USB connection and the [transport] section, then retry."
            ),
            RfxError::NotReady { device, command } => format!(
                "What happened: The transceiver was not ready to send '{command}' to {device}.\nLikely causes: The RFXtrx is still initialising.\nHow to fix: Wait for the 'transceiver ready' log line and retry."
            ),
            RfxError::UnknownDeviceType(kind) => format!(
                "What happened: Device type '{kind}' is unknown.\nLikely causes: Typo in a [[devices.switch]] type.\nHow to fix: Use a family name such as Lighting1..Lighting6, Chime1 or HomeConfort."
            ),
            RfxError::NotSwitchable(kind) => format!(
                "What happened: Device type '{kind}' cannot be used as a switch.\nLikely causes: A cover family was listed under [[devices.switch]].\nHow to fix: Move Somfy covers to [[devices.rfy]]."
            ),
            RfxError::UnknownAccessory(name) => format!(
                "What happened: No accessory named '{name}'.\nLikely causes: Typo, or the device is missing from the config.\nHow to fix: Run `rfx check` to list configured accessories."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file. Original: {msg}"
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this bridge.\nLikely causes: Syntax error, misspelled key, or a missing required field.\nHow to fix: Compare with etc/rfx_bridge.toml. Original: {msg}"
        );
    }

    if lower.contains("devices.") || lower.contains("transport.") || lower.contains("logging.") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then run `rfx check`."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error kind; anything untyped returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(e) = err.downcast_ref::<RfxError>() {
        return match e {
            RfxError::Transport { .. } | RfxError::NotReady { .. } => 3,
            RfxError::InvalidTarget(_) => 4,
            RfxError::UnknownAccessory(_) | RfxError::WrongKind { .. } => 5,
            RfxError::UnknownDeviceType(_)
            | RfxError::NotSwitchable(_)
            | RfxError::DuplicateAccessory(_) => 6,
            RfxError::Internal(_) => 1,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 6;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "error": format!("{err:#}"),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_get_stable_codes() {
        let e = eyre::Report::new(RfxError::InvalidTarget(150.0));
        assert_eq!(exit_code_for_error(&e), 4);
        assert!(humanize(&e).starts_with("What happened: Position 150"));

        let e = eyre::Report::new(RfxError::UnknownDeviceType("Foo".into()));
        assert_eq!(exit_code_for_error(&e), 6);
        assert_eq!(reason_name(&e), "UnknownDeviceType");
    }

    #[test]
    fn untyped_errors_fall_back() {
        let e = eyre::eyre!("devices.rfy 'Kitchen': open_duration_seconds must be a finite value >= 0");
        assert_eq!(exit_code_for_error(&e), 1);
        assert!(humanize(&e).contains("Configuration is invalid"));

        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Error");
    }
}
