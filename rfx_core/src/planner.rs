//! Move planning for open-loop covers.
//!
//! The radio protocol reports no position, so a move is a start command plus
//! a run time derived from the configured full-travel durations.

use std::time::Duration;

use rfx_traits::Command;

use crate::state::MotionState;

/// Start command and the full-travel duration that governs its run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlan {
    pub command: Command,
    /// Seconds the cover needs to cover the whole 0..100 range in this direction.
    pub full_travel_s: f64,
}

impl MovePlan {
    /// Motion state reported while this plan executes.
    pub fn motion(&self) -> MotionState {
        match self.command {
            Command::Up => MotionState::Increasing,
            _ => MotionState::Decreasing,
        }
    }

    /// Run time needed to travel from `current` to `target` under this plan.
    pub fn travel_time(&self, current: f64, target: f64) -> Duration {
        travel_time(self.full_travel_s, current, target)
    }
}

/// Pick the start command for a move from `current` to `target`.
///
/// With `(from, to)` being `(current, target)`, or `(target, current)` when
/// the cover is `reversed`: `from > to` sends `Down` timed by `open_s`,
/// anything else sends `Up` timed by `close_s`. The pairing of command and
/// duration is part of the observable contract and must stay as is.
///
/// Callers must not plan a move where `current == target`.
pub fn plan(current: f64, target: f64, reversed: bool, open_s: f64, close_s: f64) -> MovePlan {
    let (from, to) = if reversed {
        (target, current)
    } else {
        (current, target)
    };
    if from > to {
        MovePlan {
            command: Command::Down,
            full_travel_s: open_s,
        }
    } else {
        MovePlan {
            command: Command::Up,
            full_travel_s: close_s,
        }
    }
}

/// `round(round(full_travel_s * 1000) * |current - target| / 100)` milliseconds.
///
/// Non-finite or non-positive results collapse to `Duration::ZERO`.
pub fn travel_time(full_travel_s: f64, current: f64, target: f64) -> Duration {
    let full_ms = (full_travel_s * 1000.0).round();
    let ms = (full_ms * (current - target).abs() / 100.0).round();
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_millis(ms as u64)
}
