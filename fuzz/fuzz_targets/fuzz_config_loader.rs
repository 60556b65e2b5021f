#![no_main]
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    let Ok(cfg) = rfx_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A validated config must register without panicking (errors allowed).
    let mut bridge = rfx_core::Bridge::new(Arc::new(rfx_hardware::SimulatedRadio::new()));
    let _ = bridge.register_all(rfx_core::devices_from_config(&cfg));
});
