//! Open-loop position controller for one Somfy RTS cover.
//!
//! The motor reports nothing back. A move is started with `Up` or `Down`;
//! moves to an interior position are ended by a `Stop` sent when the
//! computed travel time elapses, moves to 0 or 100 rely on the motor's end
//! stops. Position bookkeeping is optimistic: `current` jumps to the target
//! as soon as the start command is accepted.
//!
//! Timers live in a poll-based `Scheduler`; the owner calls `tick()` (or
//! `Bridge::tick()`) to deliver expirations. All transitions therefore run
//! on the owner's thread, one at a time.

use rfx_traits::{Command, Scheduler, TimerHandle};

use crate::config::RfyProfile;
use crate::dispatch::CommandDispatcher;
use crate::error::{Result, RfxError};
use crate::planner;
use crate::sink::{Characteristic, StateSink};
use crate::state::{CoverSnapshot, MotionState};

pub struct CoverController {
    pub(crate) profile: RfyProfile,
    pub(crate) dispatcher: CommandDispatcher,
    pub(crate) scheduler: Box<dyn Scheduler>,
    pub(crate) sink: Box<dyn StateSink>,
    pub(crate) state: CoverSnapshot,
    pub(crate) pending_stop: Option<TimerHandle>,
}

impl core::fmt::Debug for CoverController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoverController")
            .field("name", &self.profile.name)
            .field("state", &self.state)
            .field("pending_stop", &self.pending_stop)
            .finish()
    }
}

fn is_valid_position(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

impl CoverController {
    pub fn profile(&self) -> &RfyProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn current_position(&self) -> f64 {
        self.state.current
    }

    pub fn target_position(&self) -> f64 {
        self.state.target
    }

    pub fn motion_state(&self) -> MotionState {
        self.state.motion
    }

    pub fn snapshot(&self) -> CoverSnapshot {
        self.state
    }

    /// Whether a stop command is still scheduled.
    pub fn has_pending_stop(&self) -> bool {
        self.pending_stop.is_some()
    }

    /// When the pending stop is due, if any.
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.pending_stop.and_then(|_| self.scheduler.next_deadline())
    }

    /// Move the cover to `value` (0 = closed, 100 = open).
    ///
    /// Out-of-range and non-finite values are rejected with
    /// `RfxError::InvalidTarget` and change nothing. A transport failure on
    /// the start command is returned after `target` has already been
    /// recorded; motion and position are left as they were.
    #[allow(clippy::float_cmp)]
    pub fn set_target_position(&mut self, value: f64) -> Result<()> {
        if !is_valid_position(value) {
            tracing::warn!(cover = %self.profile.name, value, "rejecting target position");
            return Err(eyre::Report::new(RfxError::InvalidTarget(value)));
        }

        let current = self.state.current;
        if value == current {
            // Nothing to move. A stop that is still pending belongs to the
            // move that got us here and must still fire.
            self.state.target = value;
            self.state.motion = MotionState::Stopped;
            self.publish();
            return Ok(());
        }

        self.state.target = value;
        self.publish();

        let plan = planner::plan(
            current,
            value,
            self.profile.reversed,
            self.profile.open_duration_s,
            self.profile.close_duration_s,
        );
        let travel = plan.travel_time(current, value);
        tracing::info!(
            cover = %self.profile.name,
            from = current,
            to = value,
            command = %plan.command,
            travel_ms = travel.as_millis() as u64,
            "moving"
        );
        self.dispatcher.send(plan.command)?;

        self.state.motion = plan.motion();
        self.publish();

        // A newer move always supersedes the previous stop.
        if let Some(old) = self.pending_stop.take() {
            self.scheduler.cancel(old);
        }
        if value > 0.0 && value < 100.0 {
            self.pending_stop = Some(self.scheduler.schedule(travel));
        }

        self.state.current = value;
        self.publish();
        Ok(())
    }

    /// Callback flavour of `set_target_position`; `done` runs exactly once.
    pub fn set_target_position_with<F>(&mut self, value: f64, done: F)
    where
        F: FnOnce(Result<()>),
    {
        done(self.set_target_position(value));
    }

    /// Deliver expired timers. Returns the number of stop commands issued.
    pub fn tick(&mut self) -> usize {
        let mut fired = 0;
        while let Some(handle) = self.scheduler.poll_expired() {
            if self.pending_stop != Some(handle) {
                tracing::trace!(cover = %self.profile.name, timer = handle.id(), "stale timer");
                continue;
            }
            self.pending_stop = None;
            self.finish_move();
            fired += 1;
        }
        fired
    }

    fn finish_move(&mut self) {
        if let Err(e) = self.dispatcher.send(Command::Stop) {
            tracing::error!(cover = %self.profile.name, error = %e, "stop command failed");
        }
        self.state.motion = MotionState::Stopped;
        self.publish();
    }

    /// Transceiver is up. Drives the cover shut when configured to, without
    /// touching bookkeeping; failures are logged, never returned.
    pub fn on_ready(&mut self) {
        if !self.profile.force_close_at_startup {
            return;
        }
        let plan = planner::plan(
            100.0,
            0.0,
            self.profile.reversed,
            self.profile.open_duration_s,
            self.profile.close_duration_s,
        );
        tracing::info!(cover = %self.profile.name, command = %plan.command, "closing at startup");
        if let Err(e) = self.dispatcher.send(plan.command) {
            tracing::warn!(cover = %self.profile.name, error = %e, "startup close failed");
        }
    }

    /// Cancel the pending stop, if any. Sends nothing; safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if let Some(handle) = self.pending_stop.take() {
            tracing::debug!(cover = %self.profile.name, "cancelling pending stop");
            self.scheduler.cancel(handle);
        }
    }

    fn publish(&mut self) {
        self.sink
            .publish(&self.profile.name, Characteristic::Cover(self.state));
    }
}

impl Drop for CoverController {
    fn drop(&mut self) {
        self.cleanup();
    }
}
