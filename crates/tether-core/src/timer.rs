//! Cooperative countdown timers.
//!
//! There is no background task and no preemptive firing: a countdown only
//! "fires" when the owning loop polls it, so worst-case latency is the timer
//! duration plus one receive timeout. [`Countdown::just_expired`] reports
//! true exactly once per expiry; after that the countdown is disarmed until
//! the next `reset`. The current instant is supplied by the caller, which
//! keeps the role state machines testable against a synthetic clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Countdown {
    duration: Duration,
    deadline: Option<Instant>,
}

impl Countdown {
    /// A countdown of `duration`, armed immediately when `started`.
    pub fn new(duration: Duration, started: bool, now: Instant) -> Self {
        Self {
            duration,
            deadline: started.then(|| now + duration),
        }
    }

    /// Arm (or re-arm) the countdown to fire `duration` from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
    }

    /// Disarm without firing.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// True on the first poll at or past the deadline, then false until the
    /// next `reset`.
    pub fn just_expired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
