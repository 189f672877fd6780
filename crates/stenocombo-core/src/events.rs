use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::colors::Rgba;

/// Why a shake was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakeCause {
    Milestone,
    Record,
    /// `shake_on_all` is set and nothing else shook this stroke.
    Stroke,
}

/// Why the combo dropped back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    Correction,
    CooldownExpired,
    SettingsChanged,
    Manual,
}

/// Every state change of the combo machine produces an Event.
/// The renderer consumes them in order; feedback effects key off
/// `MilestoneReached`, `RecordBroken` and `ShakeRequested`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComboEvent {
    CounterChanged {
        counter: u32,
        high_score: u32,
        at: DateTime<Utc>,
    },
    /// Active colors changed to a different tier.
    TierChanged {
        milestone: u32,
        primary: Rgba,
        secondary: Rgba,
        at: DateTime<Utc>,
    },
    CooldownStarted {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// The counter landed exactly on a configured milestone.
    MilestoneReached {
        milestone: u32,
        at: DateTime<Utc>,
    },
    /// First increment of the streak past the previous high score.
    RecordBroken {
        high_score: u32,
        previous: u32,
        at: DateTime<Utc>,
    },
    ShakeRequested {
        cause: ShakeCause,
        at: DateTime<Utc>,
    },
    ComboReset {
        reason: ResetReason,
        final_count: u32,
        at: DateTime<Utc>,
    },
    HighScoreCleared {
        at: DateTime<Utc>,
    },
}

impl ComboEvent {
    /// Snake-case event name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            ComboEvent::CounterChanged { .. } => "counter_changed",
            ComboEvent::TierChanged { .. } => "tier_changed",
            ComboEvent::CooldownStarted { .. } => "cooldown_started",
            ComboEvent::MilestoneReached { .. } => "milestone_reached",
            ComboEvent::RecordBroken { .. } => "record_broken",
            ComboEvent::ShakeRequested { .. } => "shake_requested",
            ComboEvent::ComboReset { .. } => "combo_reset",
            ComboEvent::HighScoreCleared { .. } => "high_score_cleared",
        }
    }
}
