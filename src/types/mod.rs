//! Core data types for the interval timer.
//!
//! This module defines the data structures used for:
//! - Phase and status enumerations
//! - Session configuration with validation
//! - Session state with countdown bookkeeping
//! - Theme preference
//! - Clock formatting

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Phase
// ============================================================================

/// One of the two mutually exclusive countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work countdown
    Work,
    /// Break countdown
    Break,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    /// Returns the phase that follows this one in the cycle.
    pub fn other(&self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    /// Returns the user-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "作業",
            Phase::Break => "休憩",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "w" => Ok(Phase::Work),
            "break" | "b" => Ok(Phase::Break),
            other => Err(format!("不明なフェーズです: {}", other)),
        }
    }
}

// ============================================================================
// SessionStatus
// ============================================================================

/// Derived view of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No phase selected
    #[default]
    Idle,
    WorkRunning,
    WorkPaused,
    BreakRunning,
    BreakPaused,
}

impl SessionStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::WorkRunning => "work_running",
            SessionStatus::WorkPaused => "work_paused",
            SessionStatus::BreakRunning => "break_running",
            SessionStatus::BreakPaused => "break_paused",
        }
    }

    /// Returns true if a countdown is ticking.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            SessionStatus::WorkRunning | SessionStatus::BreakRunning
        )
    }

    /// Returns the phase this status refers to, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SessionStatus::Idle => None,
            SessionStatus::WorkRunning | SessionStatus::WorkPaused => Some(Phase::Work),
            SessionStatus::BreakRunning | SessionStatus::BreakPaused => Some(Phase::Break),
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Default work duration (25 minutes).
pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;

/// Default break duration (5 minutes).
pub const DEFAULT_BREAK_SECONDS: u32 = 5 * 60;

/// Longest accepted duration for either phase (120 minutes).
pub const MAX_DURATION_SECONDS: u32 = 120 * 60;

/// Configured countdown durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Work duration in seconds (1-7200)
    pub work_seconds: u32,
    /// Break duration in seconds (1-7200)
    pub break_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_seconds: DEFAULT_WORK_SECONDS,
            break_seconds: DEFAULT_BREAK_SECONDS,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_seconds(mut self, seconds: u32) -> Self {
        self.work_seconds = seconds;
        self
    }

    /// Creates a new configuration with the specified break duration.
    pub fn with_break_seconds(mut self, seconds: u32) -> Self {
        self.break_seconds = seconds;
        self
    }

    /// Returns the configured duration of `phase`.
    pub fn seconds_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_seconds,
            Phase::Break => self.break_seconds,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        validate_duration(Phase::Work, self.work_seconds)?;
        validate_duration(Phase::Break, self.break_seconds)?;
        Ok(())
    }
}

/// Checks that a phase duration lies in `1..=MAX_DURATION_SECONDS`.
pub fn validate_duration(phase: Phase, seconds: u32) -> Result<(), String> {
    if seconds < 1 || seconds > MAX_DURATION_SECONDS {
        return Err(format!(
            "{}時間は1秒から{}分の範囲で指定してください",
            phase.label(),
            MAX_DURATION_SECONDS / 60
        ));
    }
    Ok(())
}

// ============================================================================
// SessionState
// ============================================================================

/// Represents the current state of the two countdowns.
///
/// `active_phase == None` always implies `is_running == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Phase selected by the last start (kept while paused)
    pub active_phase: Option<Phase>,
    /// Whether the active phase is counting down
    pub is_running: bool,
    /// Remaining seconds of the work countdown
    pub work_remaining_seconds: u32,
    /// Remaining seconds of the break countdown
    pub break_remaining_seconds: u32,
    /// Configured durations
    pub config: SessionConfig,
}

impl SessionState {
    /// Creates a new idle state with both countdowns full.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            active_phase: None,
            is_running: false,
            work_remaining_seconds: config.work_seconds,
            break_remaining_seconds: config.break_seconds,
            config,
        }
    }

    /// Returns the derived status.
    pub fn status(&self) -> SessionStatus {
        match (self.active_phase, self.is_running) {
            (None, _) => SessionStatus::Idle,
            (Some(Phase::Work), true) => SessionStatus::WorkRunning,
            (Some(Phase::Work), false) => SessionStatus::WorkPaused,
            (Some(Phase::Break), true) => SessionStatus::BreakRunning,
            (Some(Phase::Break), false) => SessionStatus::BreakPaused,
        }
    }

    /// Returns true if `phase` is the one currently counting down.
    pub fn is_running_phase(&self, phase: Phase) -> bool {
        self.is_running && self.active_phase == Some(phase)
    }

    /// Returns the remaining seconds of `phase`.
    pub fn remaining(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_remaining_seconds,
            Phase::Break => self.break_remaining_seconds,
        }
    }

    fn remaining_mut(&mut self, phase: Phase) -> &mut u32 {
        match phase {
            Phase::Work => &mut self.work_remaining_seconds,
            Phase::Break => &mut self.break_remaining_seconds,
        }
    }

    /// Makes `phase` the active, running countdown.
    pub fn start(&mut self, phase: Phase) {
        self.active_phase = Some(phase);
        self.is_running = true;
    }

    /// Stops the countdown, keeping the active phase for resume.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Returns to idle with both countdowns refilled.
    pub fn reset(&mut self) {
        self.active_phase = None;
        self.is_running = false;
        self.work_remaining_seconds = self.config.work_seconds;
        self.break_remaining_seconds = self.config.break_seconds;
    }

    /// Refills the countdown of `phase` from its configured duration.
    pub fn refill(&mut self, phase: Phase) {
        let seconds = self.config.seconds_for(phase);
        *self.remaining_mut(phase) = seconds;
    }

    /// Updates the configured duration of `phase`.
    ///
    /// The remaining value follows the new duration unless that phase is
    /// counting down right now. Returns true if the remaining value changed.
    pub fn set_configured(&mut self, phase: Phase, seconds: u32) -> bool {
        match phase {
            Phase::Work => self.config.work_seconds = seconds,
            Phase::Break => self.config.break_seconds = seconds,
        }
        if self.is_running_phase(phase) {
            return false;
        }
        self.refill(phase);
        true
    }

    /// Decrements the running countdown by one second.
    ///
    /// Returns true if the countdown has completed (reached 0). Does nothing
    /// and returns false when no phase is running.
    pub fn tick(&mut self) -> bool {
        let phase = match (self.active_phase, self.is_running) {
            (Some(phase), true) => phase,
            _ => return false,
        };
        let remaining = self.remaining_mut(phase);
        if *remaining > 0 {
            *remaining -= 1;
        }
        *remaining == 0
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Cosmetic theme of the terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Green-on-black with a reset blip
    Retro,
}

impl Theme {
    /// Every selectable theme.
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Retro];

    /// Returns the string representation of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Retro => "retro",
        }
    }

    /// Returns true if `reset` should be audible under this theme.
    pub fn plays_reset_cue(&self) -> bool {
        matches!(self, Theme::Retro)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "不明なテーマです: {} (light / dark / retro から選択してください)",
                    s.trim()
                )
            })
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats seconds as `m:ss` (65 → `1:05`).
pub fn format_clock(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
