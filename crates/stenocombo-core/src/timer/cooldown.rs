//! Restartable single-shot cooldown.
//!
//! Like the rest of the core, the timer owns no thread. The caller passes the
//! current instant to every call and polls for expiry; [`ComboDriver`] turns
//! [`CooldownTimer::deadline`] into a real sleep.
//!
//! ## States
//!
//! ```text
//! Idle --start--> Pending --poll(now >= deadline)--> Idle
//!                 Pending --start--> Pending (previous countdown replaced)
//!                 Pending --cancel--> Idle
//! ```
//!
//! [`ComboDriver`]: crate::driver::ComboDriver

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct CooldownTimer {
    /// Start of the pending countdown, `None` when idle.
    started_at: Option<Instant>,
    duration: Duration,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// When the pending countdown fires, if one is pending. A deadline past
    /// the range of [`Instant`] is treated as never.
    pub fn deadline(&self) -> Option<Instant> {
        self.started_at.and_then(|start| start.checked_add(self.duration))
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or_default()
    }

    /// 0.0 .. 1.0 elapsed fraction of the pending countdown; 0.0 when idle.
    pub fn progress(&self, now: Instant) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown of `duration` from `now`, replacing any pending one.
    pub fn start(&mut self, duration: Duration, now: Instant) {
        self.started_at = Some(now);
        self.duration = duration;
    }

    pub fn cancel(&mut self) {
        self.started_at = None;
    }

    /// Returns `true` once when the pending countdown has run out, then goes idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.started_at = None;
                true
            }
            _ => false,
        }
    }
}
