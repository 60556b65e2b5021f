//! Type-state builder for `CoverController`.
//!
//! The builder enforces at compile time that a profile and a radio are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use rfx_traits::{ClockScheduler, MonotonicClock, Radio, Scheduler};

use crate::config::RfyProfile;
use crate::cover::CoverController;
use crate::dispatch::{CommandDispatcher, SharedRadio};
use crate::error::{BuildError, Result};
use crate::sink::{StateSink, TracingSink};
use crate::state::CoverSnapshot;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `CoverController`. The profile is validated on `build()`.
pub struct CoverBuilder<P, R> {
    profile: Option<RfyProfile>,
    radio: Option<SharedRadio>,
    scheduler: Option<Box<dyn Scheduler>>,
    sink: Option<Box<dyn StateSink>>,
    _p: PhantomData<P>,
    _r: PhantomData<R>,
}

impl Default for CoverBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            profile: None,
            radio: None,
            scheduler: None,
            sink: None,
            _p: PhantomData,
            _r: PhantomData,
        }
    }
}

impl CoverController {
    /// Start building a CoverController.
    pub fn builder() -> CoverBuilder<Missing, Missing> {
        CoverBuilder::default()
    }

    /// Validate `profile` and construct a controller at rest in the closed
    /// position.
    pub fn new(
        profile: RfyProfile,
        radio: SharedRadio,
        scheduler: Box<dyn Scheduler>,
        sink: Box<dyn StateSink>,
    ) -> Result<Self> {
        validate_and_build(profile, radio, scheduler, sink)
    }
}

fn validate_and_build(
    profile: RfyProfile,
    radio: SharedRadio,
    scheduler: Box<dyn Scheduler>,
    sink: Box<dyn StateSink>,
) -> Result<CoverController> {
    if profile.id.trim().is_empty() {
        return Err(eyre::Report::new(BuildError::InvalidProfile(
            "device id must not be empty",
        )));
    }
    for d in [profile.open_duration_s, profile.close_duration_s] {
        if !d.is_finite() || d.is_sign_negative() {
            return Err(eyre::Report::new(BuildError::InvalidProfile(
                "travel durations must be finite and >= 0",
            )));
        }
    }

    let dispatcher = CommandDispatcher::new(radio, profile.address());
    Ok(CoverController {
        profile,
        dispatcher,
        scheduler,
        sink,
        state: CoverSnapshot::default(),
        pending_stop: None,
    })
}

impl<P, R> CoverBuilder<P, R> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<CoverController> {
        let profile = self
            .profile
            .ok_or_else(|| eyre::Report::new(BuildError::MissingProfile))?;
        let radio = self
            .radio
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRadio))?;
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Box::new(ClockScheduler::new(MonotonicClock::new())));
        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));
        validate_and_build(profile, radio, scheduler, sink)
    }

    /// Timer source; defaults to a wall-clock `ClockScheduler`.
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// State observer; defaults to `TracingSink`.
    pub fn with_sink(mut self, sink: impl StateSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }
}

// Setters that advance type-state
impl<R> CoverBuilder<Missing, R> {
    pub fn with_profile(self, profile: RfyProfile) -> CoverBuilder<Set, R> {
        CoverBuilder {
            profile: Some(profile),
            radio: self.radio,
            scheduler: self.scheduler,
            sink: self.sink,
            _p: PhantomData,
            _r: PhantomData,
        }
    }
}

impl<P> CoverBuilder<P, Missing> {
    pub fn with_radio(self, radio: impl Radio + Send + Sync + 'static) -> CoverBuilder<P, Set> {
        self.with_shared_radio(Arc::new(radio))
    }

    /// Use a transceiver handle shared with other accessories.
    pub fn with_shared_radio(self, radio: SharedRadio) -> CoverBuilder<P, Set> {
        CoverBuilder {
            profile: self.profile,
            radio: Some(radio),
            scheduler: self.scheduler,
            sink: self.sink,
            _p: PhantomData,
            _r: PhantomData,
        }
    }
}

impl CoverBuilder<Set, Set> {
    /// Validate and build. Only available when profile and radio are set.
    pub fn build(self) -> Result<CoverController> {
        self.try_build()
    }
}
