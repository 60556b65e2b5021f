//! Single-shot, cancellable timers.
//!
//! A `Scheduler` never runs code on its own. Whoever owns it asks for expired
//! handles with `poll_expired()` and acts on them, which keeps every state
//! transition on the caller's thread and lets tests drive time explicitly.

use std::time::{Duration, Instant};

use crate::clock::Clock;

/// Opaque identifier of an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Arm a timer that expires `delay` from now.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a timer. Unknown, fired or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Remove and return the earliest expired timer, if any.
    fn poll_expired(&mut self) -> Option<TimerHandle>;

    /// Deadline of the earliest armed timer.
    fn next_deadline(&self) -> Option<Instant>;
}

/// Deadline list driven by a `Clock`.
///
/// With `MonotonicClock` this is a wall-clock timer; with `ManualClock` the
/// same code runs in virtual time.
#[derive(Debug)]
pub struct ClockScheduler<C: Clock> {
    clock: C,
    next_id: u64,
    armed: Vec<(Instant, TimerHandle)>,
}

impl<C: Clock> ClockScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            armed: Vec::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of timers currently armed.
    pub fn armed(&self) -> usize {
        self.armed.len()
    }
}

impl<C: Clock> Scheduler for ClockScheduler<C> {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let now = self.clock.now();
        // Far-future delays saturate at a year instead of overflowing Instant.
        let deadline = now
            .checked_add(delay)
            .unwrap_or_else(|| now + Duration::from_secs(365 * 24 * 3600));
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);
        self.armed.push((deadline, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.armed.retain(|(_, h)| *h != handle);
    }

    fn poll_expired(&mut self) -> Option<TimerHandle> {
        let now = self.clock.now();
        let idx = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .min_by_key(|(_, (deadline, handle))| (*deadline, *handle))
            .map(|(i, _)| i)?;
        Some(self.armed.remove(idx).1)
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.armed.iter().map(|(deadline, _)| *deadline).min()
    }
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle)
    }

    fn poll_expired(&mut self) -> Option<TimerHandle> {
        (**self).poll_expired()
    }

    fn next_deadline(&self) -> Option<Instant> {
        (**self).next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn fires_once_at_deadline() {
        let clock = ManualClock::new();
        let mut sched = ClockScheduler::new(clock.clone());
        let h = sched.schedule(Duration::from_millis(100));

        clock.advance(Duration::from_millis(99));
        assert_eq!(sched.poll_expired(), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(sched.poll_expired(), Some(h));
        assert_eq!(sched.poll_expired(), None);
    }

    #[test]
    fn cancel_is_idempotent() {
        let clock = ManualClock::new();
        let mut sched = ClockScheduler::new(clock.clone());
        let h = sched.schedule(Duration::from_millis(10));
        sched.cancel(h);
        sched.cancel(h);
        clock.advance(Duration::from_secs(1));
        assert_eq!(sched.poll_expired(), None);
        assert_eq!(sched.next_deadline(), None);
    }

    #[test]
    fn expired_timers_come_out_in_deadline_order() {
        let clock = ManualClock::new();
        let mut sched = ClockScheduler::new(clock.clone());
        let late = sched.schedule(Duration::from_millis(30));
        let early = sched.schedule(Duration::from_millis(10));
        clock.advance(Duration::from_millis(50));
        assert_eq!(sched.poll_expired(), Some(early));
        assert_eq!(sched.poll_expired(), Some(late));
    }

    #[test]
    fn zero_delay_expires_immediately() {
        let clock = ManualClock::new();
        let mut sched = ClockScheduler::new(clock);
        let h = sched.schedule(Duration::ZERO);
        assert_eq!(sched.poll_expired(), Some(h));
    }
}
