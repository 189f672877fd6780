//! Combo state machine.
//!
//! Owns the live counter, the high score and the cooldown timer. Every input
//! runs to completion and returns the events it produced; the machine keeps no
//! animation state of its own.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --stroke--> Active --stroke--> Active
//! Active --correction (reset_on_undo) | cooldown expiry | reset--> Idle
//! ```
//!
//! Time is passed in by the caller, as with [`CooldownTimer`]. Call
//! [`ComboStateMachine::tick`] at or after [`ComboStateMachine::cooldown_deadline`]
//! to deliver expiry. Strokes and corrections deliver an expiry that is
//! already due before doing anything else.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::colors::{ColorEntry, ColorMilestoneTable, Rgba};
use crate::config::ComboConfig;
use crate::events::{ComboEvent, ResetReason, ShakeCause};
use crate::timer::CooldownTimer;

/// An input to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboInput {
    Stroke,
    /// Undo of the previous stroke.
    Correction,
    /// Committed settings; replaces the config and resets the combo.
    ApplyConfig(Box<ComboConfig>),
    Reset { clear_high_score: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboPhase {
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    pub counter: u32,
    pub high_score: u32,
    /// Set once the record shake has fired for the current streak.
    pub high_score_armed: bool,
    pub cooldown_active: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboSnapshot {
    pub phase: ComboPhase,
    pub counter: u32,
    pub high_score: u32,
    pub high_score_armed: bool,
    pub cooldown_active: bool,
    /// 0.0 .. 1.0 elapsed fraction of the cooldown.
    pub cooldown_progress: f64,
    pub cooldown_remaining_ms: u64,
    pub tier: u32,
    pub primary: Rgba,
    pub secondary: Rgba,
}

#[derive(Debug, Clone)]
pub struct ComboStateMachine {
    config: ComboConfig,
    table: ColorMilestoneTable,
    counter: u32,
    high_score: u32,
    high_score_armed: bool,
    /// Colors of the tier the counter is currently in.
    tier: ColorEntry,
    cooldown: CooldownTimer,
}

impl ComboStateMachine {
    /// Start idle at tier 0 with the high score stored in `config`.
    pub fn new(config: ComboConfig) -> Self {
        let table = config.color_table();
        let tier = *table.lookup(0);
        Self {
            high_score: config.high_score(),
            config,
            table,
            counter: 0,
            high_score_armed: false,
            tier,
            cooldown: CooldownTimer::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ComboState {
        ComboState {
            counter: self.counter,
            high_score: self.high_score,
            high_score_armed: self.high_score_armed,
            cooldown_active: self.cooldown.is_active(),
        }
    }

    pub fn phase(&self) -> ComboPhase {
        if self.counter == 0 {
            ComboPhase::Idle
        } else {
            ComboPhase::Active
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Colors of the active tier.
    pub fn colors(&self) -> &ColorEntry {
        &self.tier
    }

    pub fn current_tier(&self) -> u32 {
        self.tier.milestone
    }

    pub fn table(&self) -> &ColorMilestoneTable {
        &self.table
    }

    pub fn config(&self) -> &ComboConfig {
        &self.config
    }

    /// The config to persist: the current settings with the live high score.
    pub fn config_for_save(&self) -> ComboConfig {
        ComboConfig {
            highscore: i64::from(self.high_score),
            ..self.config.clone()
        }
    }

    pub fn cooldown_deadline(&self) -> Option<Instant> {
        self.cooldown.deadline()
    }

    pub fn cooldown_progress(&self, now: Instant) -> f64 {
        self.cooldown.progress(now)
    }

    pub fn snapshot(&self, now: Instant) -> ComboSnapshot {
        ComboSnapshot {
            phase: self.phase(),
            counter: self.counter,
            high_score: self.high_score,
            high_score_armed: self.high_score_armed,
            cooldown_active: self.cooldown.is_active(),
            cooldown_progress: self.cooldown.progress(now),
            cooldown_remaining_ms: u64::try_from(self.cooldown.remaining(now).as_millis())
                .unwrap_or(u64::MAX),
            tier: self.tier.milestone,
            primary: self.tier.primary,
            secondary: self.tier.secondary,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn handle(&mut self, input: ComboInput, now: Instant) -> Vec<ComboEvent> {
        match input {
            ComboInput::Stroke => self.stroke(now),
            ComboInput::Correction => self.correction(now),
            ComboInput::ApplyConfig(config) => self.apply_config(*config),
            ComboInput::Reset { clear_high_score } => self.reset(clear_high_score),
        }
    }

    /// A regular stroke: extend the combo. A cooldown that ran out before
    /// `now` is delivered first, so a late stroke starts a new combo.
    pub fn stroke(&mut self, now: Instant) -> Vec<ComboEvent> {
        let mut events = self.tick(now);
        events.extend(self.increment(now));
        events
    }

    /// An undo stroke. Resets the combo when `reset_on_undo` is set, otherwise
    /// counts like any other stroke. A due cooldown is delivered first.
    pub fn correction(&mut self, now: Instant) -> Vec<ComboEvent> {
        let mut events = self.tick(now);
        if self.config.reset_on_undo {
            events.extend(self.reset_combo(ResetReason::Correction));
        } else {
            events.extend(self.increment(now));
        }
        events
    }

    /// Deliver cooldown expiry if the deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<ComboEvent> {
        if self.cooldown.poll(now) && self.counter > 0 {
            self.reset_combo(ResetReason::CooldownExpired)
        } else {
            Vec::new()
        }
    }

    /// Replace the settings and color table, then reset the combo.
    /// The live high score carries over.
    pub fn apply_config(&mut self, config: ComboConfig) -> Vec<ComboEvent> {
        self.table = config.color_table();
        self.config = config;
        self.reset_combo(ResetReason::SettingsChanged)
    }

    /// Reset the combo, optionally zeroing the high score as well.
    pub fn reset(&mut self, clear_high_score: bool) -> Vec<ComboEvent> {
        let mut events = self.reset_combo(ResetReason::Manual);
        if clear_high_score {
            tracing::info!(previous = self.high_score, "high score cleared");
            self.high_score = 0;
            events.push(ComboEvent::HighScoreCleared { at: Utc::now() });
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Count one stroke, restart the cooldown and emit feedback signals.
    fn increment(&mut self, now: Instant) -> Vec<ComboEvent> {
        let at = Utc::now();
        let mut events = Vec::new();

        self.counter = self.counter.saturating_add(1);

        let previous_record = self.high_score;
        let record_broken = self.counter > self.high_score;
        if record_broken {
            self.high_score = self.counter;
        }

        events.push(ComboEvent::CounterChanged {
            counter: self.counter,
            high_score: self.high_score,
            at,
        });

        let entry = *self.table.lookup(i64::from(self.counter));
        if entry.milestone != self.tier.milestone {
            self.tier = entry;
            events.push(tier_event(&entry, at));
        }

        let duration = self.config.cooldown();
        self.cooldown.start(duration, now);
        events.push(ComboEvent::CooldownStarted {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            at,
        });

        let mut shaken = false;
        if self.table.is_milestone(self.counter) {
            tracing::debug!(milestone = self.counter, "milestone reached");
            events.push(ComboEvent::MilestoneReached {
                milestone: self.counter,
                at,
            });
            events.push(ComboEvent::ShakeRequested {
                cause: ShakeCause::Milestone,
                at,
            });
            shaken = true;
        }

        if record_broken {
            if !self.high_score_armed {
                tracing::info!(
                    high_score = self.high_score,
                    previous = previous_record,
                    "high score broken"
                );
                events.push(ComboEvent::RecordBroken {
                    high_score: self.high_score,
                    previous: previous_record,
                    at,
                });
                if !shaken {
                    events.push(ComboEvent::ShakeRequested {
                        cause: ShakeCause::Record,
                        at,
                    });
                    shaken = true;
                }
            }
            self.high_score_armed = true;
        }

        if self.config.shake_on_all && !shaken {
            events.push(ComboEvent::ShakeRequested {
                cause: ShakeCause::Stroke,
                at,
            });
        }

        events
    }

    fn reset_combo(&mut self, reason: ResetReason) -> Vec<ComboEvent> {
        let at = Utc::now();
        let final_count = self.counter;

        self.counter = 0;
        self.high_score_armed = false;
        self.cooldown.cancel();
        tracing::debug!(?reason, final_count, "combo reset");

        let mut events = vec![
            ComboEvent::ComboReset {
                reason,
                final_count,
                at,
            },
            ComboEvent::CounterChanged {
                counter: 0,
                high_score: self.high_score,
                at,
            },
        ];

        let base = *self.table.lookup(0);
        if base != self.tier {
            self.tier = base;
            events.push(tier_event(&base, at));
        }
        events
    }
}

fn tier_event(entry: &ColorEntry, at: chrono::DateTime<Utc>) -> ComboEvent {
    ComboEvent::TierChanged {
        milestone: entry.milestone,
        primary: entry.primary,
        secondary: entry.secondary,
        at,
    }
}
