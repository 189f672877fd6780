//! Deterministic replay of a stroke script.
//!
//! A script is a whitespace-separated list of steps run against a
//! [`ComboStateMachine`] on a virtual clock. No real time passes; `wait`
//! advances the clock and delivers any cooldown expiry at its exact deadline.
//!
//! ```text
//! stroke:9 wait 1500 s undo reset! stroke wait 2000
//! ```
//!
//! | Token                          | Step                              |
//! |--------------------------------|-----------------------------------|
//! | `stroke`, `s`                  | one stroke                        |
//! | `correction`, `undo`, `u`, `*` | one correction                    |
//! | `wait <ms>`, `+<ms>`           | advance the clock                 |
//! | `reset`                        | manual reset                      |
//! | `reset!`                       | manual reset and clear high score |
//!
//! `stroke` and `correction` (and their short forms) accept a `:<n>` repeat
//! suffix. Anything after `#` on a line is ignored.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::ComboConfig;
use crate::error::{CoreError, Result};
use crate::events::ComboEvent;
use crate::machine::{ComboSnapshot, ComboStateMachine};

/// Upper bound on a single `:<n>` repeat.
const MAX_REPEAT: u32 = 100_000;

/// Upper bound on the summed waits of one script: a year of virtual time.
const MAX_TOTAL_WAIT_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// One parsed script step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Stroke,
    Correction,
    Wait(Duration),
    Reset { clear_high_score: bool },
}

/// Parse a script into steps, expanding repeats.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>> {
    let tokens: Vec<&str> = script
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(str::split_whitespace)
        .collect();

    let mut steps = Vec::new();
    let mut total_wait_ms: u64 = 0;
    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        let lower = token.to_ascii_lowercase();

        if lower == "wait" {
            let Some(arg) = tokens.get(index + 1) else {
                return Err(script_error(index, token, "expected milliseconds after 'wait'"));
            };
            let ms = parse_millis(index + 1, arg, arg)?;
            total_wait_ms = add_wait(total_wait_ms, ms, index + 1, arg)?;
            steps.push(ScriptStep::Wait(Duration::from_millis(ms)));
            index += 2;
            continue;
        }
        if let Some(millis) = lower.strip_prefix('+') {
            let ms = parse_millis(index, token, millis)?;
            total_wait_ms = add_wait(total_wait_ms, ms, index, token)?;
            steps.push(ScriptStep::Wait(Duration::from_millis(ms)));
            index += 1;
            continue;
        }

        let (name, repeat) = match lower.split_once(':') {
            Some((name, count)) => (name, parse_repeat(index, token, count)?),
            None => (lower.as_str(), 1),
        };
        let step = match name {
            "stroke" | "s" => ScriptStep::Stroke,
            "correction" | "undo" | "u" | "*" => ScriptStep::Correction,
            "reset" if repeat == 1 => ScriptStep::Reset {
                clear_high_score: false,
            },
            "reset!" if repeat == 1 => ScriptStep::Reset {
                clear_high_score: true,
            },
            "reset" | "reset!" => {
                return Err(script_error(index, token, "reset cannot be repeated"));
            }
            _ => return Err(script_error(index, token, "unknown step")),
        };
        steps.extend(std::iter::repeat(step).take(repeat as usize));
        index += 1;
    }
    Ok(steps)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let script = std::fs::read_to_string(path)?;
    parse_script(&script)
}

fn parse_millis(index: usize, token: &str, text: &str) -> Result<u64> {
    text.parse::<u64>()
        .map_err(|_| script_error(index, token, "expected a non-negative number of milliseconds"))
}

fn add_wait(total: u64, ms: u64, index: usize, token: &str) -> Result<u64> {
    total
        .checked_add(ms)
        .filter(|sum| *sum <= MAX_TOTAL_WAIT_MS)
        .ok_or_else(|| script_error(index, token, "total wait exceeds one year"))
}

fn parse_repeat(index: usize, token: &str, text: &str) -> Result<u32> {
    match text.parse::<u32>() {
        Ok(n) if (1..=MAX_REPEAT).contains(&n) => Ok(n),
        _ => Err(script_error(
            index,
            token,
            &format!("repeat count must be between 1 and {MAX_REPEAT}"),
        )),
    }
}

fn script_error(index: usize, token: &str, message: &str) -> CoreError {
    CoreError::Script {
        index,
        token: token.to_string(),
        message: message.to_string(),
    }
}

/// An event stamped with the virtual time it happened at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Milliseconds since the start of the run.
    pub elapsed_ms: u64,
    pub event: ComboEvent,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub events: Vec<TimedEvent>,
    pub snapshot: ComboSnapshot,
    pub elapsed_ms: u64,
}

impl SimulationReport {
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.event.name() == name).count()
    }

    /// One JSON object per line: each timed event (if `with_events`), then
    /// the final snapshot.
    pub fn to_json_lines(&self, with_events: bool) -> Result<String> {
        let mut out = String::new();
        if with_events {
            for event in &self.events {
                let _ = writeln!(out, "{}", serde_json::to_string(event)?);
            }
        }
        let _ = writeln!(out, "{}", serde_json::to_string(&self.snapshot)?);
        Ok(out)
    }
}

/// Runs script steps against a machine on a virtual clock.
pub struct SimulationHarness {
    machine: ComboStateMachine,
    origin: Instant,
    /// Always representable as `origin + elapsed`; see [`Self::advance`].
    elapsed: Duration,
    steps_run: usize,
    events: Vec<TimedEvent>,
}

impl SimulationHarness {
    pub fn new(config: ComboConfig) -> Self {
        Self {
            machine: ComboStateMachine::new(config),
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            steps_run: 0,
            events: Vec::new(),
        }
    }

    pub fn machine(&self) -> &ComboStateMachine {
        &self.machine
    }

    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Apply one step.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Script`] if a wait would move the clock past the
    /// range of [`Instant`].
    pub fn step(&mut self, step: ScriptStep) -> Result<()> {
        match step {
            ScriptStep::Stroke => {
                let produced = self.machine.stroke(self.now());
                self.record(produced);
            }
            ScriptStep::Correction => {
                let produced = self.machine.correction(self.now());
                self.record(produced);
            }
            ScriptStep::Reset { clear_high_score } => {
                let produced = self.machine.reset(clear_high_score);
                self.record(produced);
            }
            ScriptStep::Wait(duration) => self.advance(duration)?,
        }
        self.steps_run += 1;
        Ok(())
    }

    /// Move the clock forward, stopping at a cooldown deadline on the way.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Script`] if the new time is not representable.
    pub fn advance(&mut self, duration: Duration) -> Result<()> {
        let target = self
            .elapsed
            .checked_add(duration)
            .filter(|target| self.origin.checked_add(*target).is_some())
            .ok_or_else(|| CoreError::Script {
                index: self.steps_run,
                token: format!("wait {}", millis(duration)),
                message: "wait moves the virtual clock out of range".to_string(),
            })?;
        if let Some(deadline) = self.machine.cooldown_deadline() {
            let due = deadline.saturating_duration_since(self.origin);
            if due <= target {
                self.elapsed = self.elapsed.max(due);
                let produced = self.machine.tick(self.now());
                self.record(produced);
            }
        }
        self.elapsed = target;
        Ok(())
    }

    /// Apply every step and return the report with the final machine.
    ///
    /// # Errors
    ///
    /// Stops at the first step that fails; see [`Self::step`].
    pub fn run(mut self, steps: &[ScriptStep]) -> Result<(SimulationReport, ComboStateMachine)> {
        for &step in steps {
            self.step(step)?;
        }
        tracing::debug!(
            steps = steps.len(),
            events = self.events.len(),
            "simulation finished"
        );
        let report = SimulationReport {
            snapshot: self.machine.snapshot(self.now()),
            elapsed_ms: millis(self.elapsed),
            events: self.events,
        };
        Ok((report, self.machine))
    }

    fn record(&mut self, produced: Vec<ComboEvent>) {
        let elapsed_ms = millis(self.elapsed);
        self.events.extend(
            produced
                .into_iter()
                .map(|event| TimedEvent { elapsed_ms, event }),
        );
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Validate `config`, then parse and run a script in one go.
pub fn run_script(config: ComboConfig, script: &str) -> Result<SimulationReport> {
    config.validate()?;
    let steps = parse_script(script)?;
    let (report, _) = SimulationHarness::new(config).run(&steps)?;
    Ok(report)
}
