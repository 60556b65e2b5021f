//! Observable cover state.

use std::fmt;

/// Direction the cover is believed to be moving in.
///
/// Discriminants match the HomeKit `PositionState` characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MotionState {
    Decreasing = 0,
    Increasing = 1,
    #[default]
    Stopped = 2,
}

impl MotionState {
    pub fn as_str(self) -> &'static str {
        match self {
            MotionState::Decreasing => "decreasing",
            MotionState::Increasing => "increasing",
            MotionState::Stopped => "stopped",
        }
    }

    pub fn hap_value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of a cover's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverSnapshot {
    pub motion: MotionState,
    /// Last requested position, 0 (closed) to 100 (open).
    pub target: f64,
    /// Believed position; set optimistically when a move starts.
    pub current: f64,
}
