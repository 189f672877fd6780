//! # Stenocombo Core Library
//!
//! This library provides the core logic for a stroke combo counter: it counts
//! consecutive strokes, lets the combo decay after a period of inactivity,
//! maps the count to a color tier and tracks a persistent high score.
//!
//! Rendering is left to the caller. The core emits [`ComboEvent`]s and
//! [`ComboSnapshot`]s that a widget, overlay or terminal can draw.
//!
//! ## Architecture
//!
//! - **Color milestones**: parse the `"<count>: #RRGGBB, #RRGGBB"` tier text
//!   and round counts down to the nearest tier
//! - **Config**: typed settings record with a static field table, backed by a
//!   flat TOML key-value file
//! - **Combo machine**: wall-clock state machine; the caller passes the
//!   current instant and calls `tick()` for cooldown expiry
//! - **Driver**: tokio event loop that delivers inputs and cooldown expiry in
//!   order
//! - **Simulation**: replays stroke scripts on a virtual clock
//!
//! ## Key Components
//!
//! - [`ComboStateMachine`]: counter, high score and cooldown
//! - [`ColorMilestoneTable`]: tier lookup
//! - [`ComboConfig`]: settings
//! - [`ComboDriver`]: real-time loop

pub mod colors;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod machine;
pub mod simulation;
pub mod timer;

pub use colors::{ColorEntry, ColorMilestoneTable, Rgba, SkipReason, SkippedLine};
pub use config::{
    Alignment, ComboConfig, ConfigOverrides, Field, FieldKind, FieldValue, MemoryStore, Platform,
    SettingsStore, TomlStore,
};
pub use driver::ComboDriver;
pub use error::{ColorParseError, ConfigError, CoreError};
pub use events::{ComboEvent, ResetReason, ShakeCause};
pub use machine::{ComboInput, ComboPhase, ComboSnapshot, ComboState, ComboStateMachine};
pub use simulation::{ScriptStep, SimulationHarness, SimulationReport};
pub use timer::CooldownTimer;
