//! Async driver of the session controller.
//!
//! The runtime owns everything time related: the single tick source, the
//! auto-advance delay and the in-flight tip requests. All of them report
//! back as [`SessionInput`]s, so the controller only ever sees one input at
//! a time.
//!
//! # Architecture
//!
//! ```text
//!  SessionHandle ──┐
//!  advance sleep ──┼──▶ inputs ──▶ SessionController ──▶ events
//!  tip task ───────┘                                       │
//!                                ┌─────────────────────────┤
//!                                ▼            ▼            ▼
//!                             ticker      CuePlayer     Presenter
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::display::{DisplaySink, Presenter};
use crate::sound::{Cue, SoundPlayer};
use crate::tips::{TipProvider, TipResult};
use crate::types::{Phase, SessionConfig, SessionState, Theme};

use super::controller::{Command, SessionController, SessionEvent, TICK_PERIOD};
use super::error::SessionError;

// ============================================================================
// SessionInput
// ============================================================================

/// Inputs accepted by the runtime loop.
#[derive(Debug)]
pub enum SessionInput {
    /// A user command, answered on `reply` once applied
    Command {
        command: Command,
        reply: Option<oneshot::Sender<Result<(), SessionError>>>,
    },
    /// Switch the display theme
    SetTheme(Theme),
    /// The auto-advance delay elapsed
    PhaseEnded { token: u64 },
    /// A tip request settled
    TipResolved { request: u64, result: TipResult },
    /// Ask for a copy of the current state
    Snapshot(oneshot::Sender<SessionState>),
    /// Stop the loop
    Shutdown,
}

// ============================================================================
// SessionHandle
// ============================================================================

/// Cloneable handle for talking to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionInput>,
}

impl SessionHandle {
    /// Applies a command and waits for the outcome.
    ///
    /// # Errors
    ///
    /// Returns the controller's refusal, or `SessionError::Stopped` if the
    /// runtime is gone.
    pub async fn command(&self, command: Command) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionInput::Command {
                command,
                reply: Some(reply),
            })
            .map_err(|_| SessionError::Stopped)?;
        rx.await.map_err(|_| SessionError::Stopped)?
    }

    /// Switches the display theme.
    pub fn set_theme(&self, theme: Theme) -> Result<(), SessionError> {
        self.tx
            .send(SessionInput::SetTheme(theme))
            .map_err(|_| SessionError::Stopped)
    }

    /// Returns a copy of the current session state.
    pub async fn snapshot(&self) -> Result<SessionState, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionInput::Snapshot(reply))
            .map_err(|_| SessionError::Stopped)?;
        rx.await.map_err(|_| SessionError::Stopped)
    }

    /// Asks the runtime to stop. Does nothing if it already has.
    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionInput::Shutdown);
    }
}

// ============================================================================
// SessionRuntime
// ============================================================================

/// Runs one session until shut down.
pub struct SessionRuntime<D: DisplaySink> {
    controller: SessionController,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    inputs_tx: mpsc::UnboundedSender<SessionInput>,
    inputs: mpsc::UnboundedReceiver<SessionInput>,
    /// Armed tick source and its generation
    ticker: Option<(u64, Interval)>,
    presenter: Presenter<D>,
    sound: Option<Arc<dyn SoundPlayer>>,
    tips: Arc<dyn TipProvider>,
    theme: Theme,
}

impl<D: DisplaySink> SessionRuntime<D> {
    /// Creates an idle session.
    pub fn new(config: SessionConfig, presenter: Presenter<D>, tips: Arc<dyn TipProvider>) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (inputs_tx, inputs) = mpsc::unbounded_channel();
        Self {
            controller: SessionController::new(config, event_tx),
            events,
            inputs_tx,
            inputs,
            ticker: None,
            presenter,
            sound: None,
            tips,
            theme: Theme::default(),
        }
    }

    /// Plays cues on `player`.
    pub fn with_sound(mut self, player: Arc<dyn SoundPlayer>) -> Self {
        self.sound = Some(player);
        self
    }

    /// Sets the initial theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a handle for sending input to this session.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.inputs_tx.clone(),
        }
    }

    /// Runs the session until [`SessionHandle::shutdown`] is called.
    ///
    /// Returns the final state.
    pub async fn run(mut self) -> Result<SessionState> {
        info!("Session started");
        self.presenter.render_all(self.controller.state(), self.theme);

        loop {
            tokio::select! {
                generation = next_tick(&mut self.ticker) => {
                    let result = self.controller.tick(generation);
                    check(result).context("ティック処理に失敗しました")?;
                }
                input = self.inputs.recv() => {
                    match input {
                        None | Some(SessionInput::Shutdown) => break,
                        Some(input) => self.handle_input(input)?,
                    }
                }
            }
            self.dispatch_events();
        }

        info!("Session stopped");
        Ok(self.controller.state().clone())
    }

    fn handle_input(&mut self, input: SessionInput) -> Result<()> {
        match input {
            SessionInput::Command { command, reply } => {
                debug!("Command: {:?}", command);
                let result = self.controller.handle_command(command);
                if let Err(SessionError::EventChannelClosed) = result {
                    return Err(SessionError::EventChannelClosed)
                        .context("コマンドの処理に失敗しました");
                }
                // The reply is sent only once the display has caught up
                self.dispatch_events();
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            SessionInput::SetTheme(theme) => {
                debug!("Theme: {}", theme);
                self.theme = theme;
                self.presenter.set_theme(theme);
            }
            SessionInput::PhaseEnded { token } => {
                check(self.controller.advance(token)).context("自動切り替えに失敗しました")?;
            }
            SessionInput::TipResolved { request, result } => {
                check(self.controller.tip_resolved(request, result))
                    .context("ヒントの反映に失敗しました")?;
            }
            SessionInput::Snapshot(reply) => {
                let _ = reply.send(self.controller.state().clone());
            }
            SessionInput::Shutdown => {}
        }
        Ok(())
    }

    /// Performs the side effects of every pending event, then renders it.
    fn dispatch_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.perform(&event);
            self.presenter.present(&event, self.controller.state());
        }
    }

    fn perform(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::TickerArmed { generation } => {
                let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.ticker = Some((*generation, ticker));
            }
            SessionEvent::TickerCancelled => self.ticker = None,
            SessionEvent::PhaseStarted { phase, resumed } => {
                info!("{} started (resumed: {})", phase, resumed);
                self.play(Cue::Start);
            }
            SessionEvent::PhaseCompleted { phase } => {
                info!("{} completed", phase);
                if *phase == Phase::Work {
                    self.play(Cue::Completion);
                }
            }
            SessionEvent::AdvanceScheduled { token, delay, .. } => {
                let tx = self.inputs_tx.clone();
                let (token, delay) = (*token, *delay);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(SessionInput::PhaseEnded { token });
                });
            }
            SessionEvent::Reset => {
                if self.theme.plays_reset_cue() {
                    self.play(Cue::Reset);
                }
            }
            SessionEvent::TipRequested { request } => {
                let tx = self.inputs_tx.clone();
                let tips = Arc::clone(&self.tips);
                let request = *request;
                tokio::spawn(async move {
                    let result = tips.request_tip().await;
                    if let Err(e) = &result {
                        debug!("Tip request {} failed: {}", request, e);
                    }
                    let _ = tx.send(SessionInput::TipResolved { request, result });
                });
            }
            SessionEvent::Paused { .. }
            | SessionEvent::Tick { .. }
            | SessionEvent::RemainingChanged { .. }
            | SessionEvent::TipResolved { .. }
            | SessionEvent::TipDiscarded { .. } => {}
        }
    }

    fn play(&self, cue: Cue) {
        if let Some(player) = &self.sound {
            if let Err(e) = player.play(cue) {
                warn!("Failed to play {} cue: {}", cue.as_str(), e);
            }
        }
    }
}

/// Waits for the next tick of the armed source, or forever if none is.
async fn next_tick(ticker: &mut Option<(u64, Interval)>) -> u64 {
    match ticker {
        Some((generation, interval)) => {
            interval.tick().await;
            *generation
        }
        None => std::future::pending().await,
    }
}

/// Lets refused transitions pass and keeps internal failures.
fn check(result: Result<(), SessionError>) -> Result<(), SessionError> {
    match result {
        Err(e) if e.is_user_error() => {
            debug!("Transition refused: {}", e);
            Ok(())
        }
        other => other,
    }
}
