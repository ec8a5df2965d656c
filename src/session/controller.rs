//! Session state machine for the interval timer.
//!
//! This module provides the core transition logic:
//! - Start / pause / toggle / reset of the two countdowns
//! - Countdown ticks with a single armed tick source
//! - Completion and delayed auto-advance into the other phase
//! - Tip request bookkeeping for breaks
//!
//! The controller is synchronous and does no I/O. Everything observable is
//! reported as a [`SessionEvent`] on an unbounded channel; the runtime turns
//! those into timers, network calls, sounds and display updates.

use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::debug;

use crate::tips::TipResult;
use crate::types::{validate_duration, Phase, SessionConfig, SessionState};

use super::error::SessionError;

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Pause between a finished countdown and the start of the next phase.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(500);

// ============================================================================
// Command
// ============================================================================

/// User commands accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pause `phase` if it is running, start it otherwise
    Toggle(Phase),
    /// Start (or resume) `phase`, preempting the other one
    Start(Phase),
    /// Pause whichever phase is running
    Pause,
    /// Stop everything and refill both countdowns
    Reset,
    /// Change the configured duration of a phase
    SetDuration { phase: Phase, seconds: u32 },
}

// ============================================================================
// SessionEvent
// ============================================================================

/// Everything the controller reports to the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new tick source must be installed; ticks carry `generation`.
    TickerArmed { generation: u64 },
    /// The current tick source must be dropped.
    TickerCancelled,
    /// A countdown started. `resumed` is true when continuing a paused one.
    PhaseStarted { phase: Phase, resumed: bool },
    /// The running countdown was paused.
    Paused { phase: Phase },
    /// One second elapsed.
    Tick { phase: Phase, remaining_seconds: u32 },
    /// A countdown reached zero.
    PhaseCompleted { phase: Phase },
    /// A remaining value changed outside of a tick.
    RemainingChanged { phase: Phase, remaining_seconds: u32 },
    /// `next` should start after `delay` unless the token is invalidated.
    AdvanceScheduled {
        next: Phase,
        token: u64,
        delay: Duration,
    },
    /// Everything was reset to idle.
    Reset,
    /// A tip must be fetched for the break that just started.
    TipRequested { request: u64 },
    /// A tip result arrived for the current break.
    TipResolved { request: u64, result: TipResult },
    /// A tip result arrived after its break ended and was dropped.
    TipDiscarded { request: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAdvance {
    token: u64,
    next: Phase,
}

// ============================================================================
// SessionController
// ============================================================================

/// Owns the session state and applies every transition to it.
pub struct SessionController {
    /// Current session state
    state: SessionState,
    /// Generation of the most recently armed tick source
    tick_generation: u64,
    /// Whether a tick source is currently installed
    ticker_armed: bool,
    next_advance_token: u64,
    pending_advance: Option<PendingAdvance>,
    next_tip_request: u64,
    /// Request whose result may still be shown
    pending_tip: Option<u64>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionController {
    /// Creates an idle controller with the given durations and event channel.
    pub fn new(config: SessionConfig, event_tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            state: SessionState::new(config),
            tick_generation: 0,
            ticker_armed: false,
            next_advance_token: 0,
            pending_advance: None,
            next_tip_request: 0,
            pending_tip: None,
            event_tx,
        }
    }

    /// Applies a user command.
    ///
    /// Any command other than a duration change cancels a scheduled
    /// auto-advance.
    pub fn handle_command(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::Toggle(phase) => self.toggle(phase),
            Command::Start(phase) => self.start(phase),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::SetDuration { phase, seconds } => {
                self.set_configured_duration(phase, seconds)
            }
        }
    }

    /// Starts (or resumes) the work countdown.
    pub fn start_work(&mut self) -> Result<(), SessionError> {
        self.start(Phase::Work)
    }

    /// Starts (or resumes) the break countdown.
    pub fn start_break(&mut self) -> Result<(), SessionError> {
        self.start(Phase::Break)
    }

    /// Starts `phase`, preempting whichever phase is running.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` if `phase` is already running.
    pub fn start(&mut self, phase: Phase) -> Result<(), SessionError> {
        if self.state.is_running_phase(phase) {
            return Err(SessionError::AlreadyRunning(phase));
        }

        let previous = self.state.active_phase;
        let just_completed = self.pending_advance.take().is_some();
        let resumed = previous == Some(phase) && !just_completed;

        if previous == Some(Phase::Break) && phase != Phase::Break {
            self.pending_tip = None;
        }

        self.cancel_ticker()?;
        self.state.start(phase);
        self.arm_ticker()?;
        self.emit(SessionEvent::PhaseStarted { phase, resumed })?;

        if phase == Phase::Break && !resumed {
            self.request_tip()?;
        }
        Ok(())
    }

    /// Pauses the running countdown.
    ///
    /// Right after a completion nothing is running yet; pausing then
    /// cancels the scheduled auto-advance instead.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` if nothing is counting down and no
    /// auto-advance is scheduled.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        let phase = match self.state.active_phase {
            Some(phase) if self.state.is_running => phase,
            _ => {
                if let Some(advance) = self.pending_advance.take() {
                    debug!("Auto-advance {} cancelled by pause", advance.token);
                    return Ok(());
                }
                return Err(SessionError::NotRunning);
            }
        };

        self.cancel_ticker()?;
        self.state.pause();
        self.emit(SessionEvent::Paused { phase })
    }

    /// Pauses `phase` if it is the running one, starts it otherwise.
    pub fn toggle(&mut self, phase: Phase) -> Result<(), SessionError> {
        if self.state.is_running_phase(phase) {
            self.pause()
        } else {
            self.start(phase)
        }
    }

    /// Returns to idle with both countdowns refilled. Valid from any state.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.pending_advance = None;
        self.pending_tip = None;
        self.cancel_ticker()?;
        self.state.reset();
        self.emit(SessionEvent::Reset)
    }

    /// Changes the configured duration of `phase`.
    ///
    /// A countdown that is running keeps its remaining time; otherwise the
    /// remaining time follows the new duration at once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` if `seconds` is out of range.
    pub fn set_configured_duration(&mut self, phase: Phase, seconds: u32) -> Result<(), SessionError> {
        validate_duration(phase, seconds).map_err(SessionError::InvalidDuration)?;

        if self.state.set_configured(phase, seconds) {
            self.emit(SessionEvent::RemainingChanged {
                phase,
                remaining_seconds: self.state.remaining(phase),
            })?;
        } else {
            debug!("{} is running, new duration applies from the next start", phase);
        }
        Ok(())
    }

    /// Handles one tick of the tick source with the given generation.
    ///
    /// Ticks from a cancelled tick source are ignored.
    pub fn tick(&mut self, generation: u64) -> Result<(), SessionError> {
        if !self.ticker_armed || generation != self.tick_generation {
            debug!("Ignoring tick from stale generation {}", generation);
            return Ok(());
        }

        let phase = match self.state.active_phase {
            Some(phase) if self.state.is_running => phase,
            _ => return Ok(()),
        };

        let completed = self.state.tick();
        self.emit(SessionEvent::Tick {
            phase,
            remaining_seconds: self.state.remaining(phase),
        })?;

        if completed {
            self.handle_phase_complete(phase)?;
        }
        Ok(())
    }

    /// Handles a finished countdown.
    fn handle_phase_complete(&mut self, phase: Phase) -> Result<(), SessionError> {
        self.cancel_ticker()?;
        self.state.pause();
        if phase == Phase::Break {
            self.pending_tip = None;
        }
        self.emit(SessionEvent::PhaseCompleted { phase })?;

        self.state.refill(phase);
        self.emit(SessionEvent::RemainingChanged {
            phase,
            remaining_seconds: self.state.remaining(phase),
        })?;

        self.next_advance_token += 1;
        let advance = PendingAdvance {
            token: self.next_advance_token,
            next: phase.other(),
        };
        self.pending_advance = Some(advance);
        self.emit(SessionEvent::AdvanceScheduled {
            next: advance.next,
            token: advance.token,
            delay: ADVANCE_DELAY,
        })
    }

    /// Performs a scheduled auto-advance if `token` is still current.
    ///
    /// The advance goes through [`start`](Self::start) like any user start.
    pub fn advance(&mut self, token: u64) -> Result<(), SessionError> {
        match self.pending_advance {
            Some(advance) if advance.token == token => {
                self.pending_advance = None;
                self.start(advance.next)
            }
            _ => {
                debug!("Ignoring superseded advance {}", token);
                Ok(())
            }
        }
    }

    /// Applies or discards a tip result.
    ///
    /// Only the pending request of the break that is still in progress is
    /// shown; anything else is discarded.
    pub fn tip_resolved(&mut self, request: u64, result: TipResult) -> Result<(), SessionError> {
        if self.pending_tip == Some(request) {
            self.pending_tip = None;
            self.emit(SessionEvent::TipResolved { request, result })
        } else {
            debug!("Discarding tip result for request {}", request);
            self.emit(SessionEvent::TipDiscarded { request })
        }
    }

    fn request_tip(&mut self) -> Result<(), SessionError> {
        self.next_tip_request += 1;
        let request = self.next_tip_request;
        self.pending_tip = Some(request);
        self.emit(SessionEvent::TipRequested { request })
    }

    fn arm_ticker(&mut self) -> Result<(), SessionError> {
        self.tick_generation += 1;
        self.ticker_armed = true;
        self.emit(SessionEvent::TickerArmed {
            generation: self.tick_generation,
        })
    }

    fn cancel_ticker(&mut self) -> Result<(), SessionError> {
        if !self.ticker_armed {
            return Ok(());
        }
        self.ticker_armed = false;
        self.emit(SessionEvent::TickerCancelled)
    }

    fn emit(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.event_tx
            .send(event)
            .map_err(|_| SessionError::EventChannelClosed)
    }

    /// Returns a reference to the current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the generation of the most recently armed tick source.
    pub fn tick_generation(&self) -> u64 {
        self.tick_generation
    }

    /// Returns the tip request whose result would still be shown.
    pub fn pending_tip(&self) -> Option<u64> {
        self.pending_tip
    }

    /// Returns true if an auto-advance is scheduled.
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// Returns a mutable reference to the session state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================
