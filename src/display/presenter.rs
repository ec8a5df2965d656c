//! Maps session events onto a display sink.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::session::SessionEvent;
use crate::tips::pick_offline_tip;
use crate::types::{format_clock, Phase, SessionState, Theme};

use super::{ControlView, DisplayError, DisplaySink, TipView};

/// Keeps a display sink in step with the session.
///
/// Display failures are logged and otherwise ignored.
pub struct Presenter<D: DisplaySink> {
    sink: D,
    rng: StdRng,
}

impl<D: DisplaySink> Presenter<D> {
    /// Creates a presenter with an entropy-seeded offline tip choice.
    pub fn new(sink: D) -> Self {
        Self {
            sink,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a presenter with a deterministic offline tip choice.
    pub fn with_seed(sink: D, seed: u64) -> Self {
        Self {
            sink,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws the whole display from scratch.
    pub fn render_all(&mut self, state: &SessionState, theme: Theme) {
        self.set_theme(theme);
        for phase in [Phase::Work, Phase::Break] {
            self.show_remaining(phase, state.remaining(phase));
        }
        self.refresh_controls(state);
    }

    /// Applies one controller event. `state` is the state after the event.
    pub fn present(&mut self, event: &SessionEvent, state: &SessionState) {
        match event {
            SessionEvent::Tick {
                phase,
                remaining_seconds,
            }
            | SessionEvent::RemainingChanged {
                phase,
                remaining_seconds,
            } => self.show_remaining(*phase, *remaining_seconds),
            SessionEvent::PhaseStarted { .. } | SessionEvent::Paused { .. } => {
                self.refresh_controls(state)
            }
            SessionEvent::PhaseCompleted { phase } => {
                self.refresh_controls(state);
                let result = self.sink.celebrate(*phase);
                log_failure("celebration", result);
            }
            SessionEvent::Reset => {
                for phase in [Phase::Work, Phase::Break] {
                    self.show_remaining(phase, state.remaining(phase));
                }
                self.refresh_controls(state);
            }
            SessionEvent::TipRequested { .. } => {
                let result = self.sink.set_tip(&TipView::Loading);
                log_failure("tip placeholder", result);
            }
            SessionEvent::TipResolved { result, .. } => {
                let offline = pick_offline_tip(&mut self.rng);
                let view = TipView::from_result(result, offline);
                let result = self.sink.set_tip(&view);
                log_failure("tip", result);
            }
            SessionEvent::TickerArmed { .. }
            | SessionEvent::TickerCancelled
            | SessionEvent::AdvanceScheduled { .. }
            | SessionEvent::TipDiscarded { .. } => {}
        }
    }

    /// Switches the display theme.
    pub fn set_theme(&mut self, theme: Theme) {
        let result = self.sink.set_theme(theme);
        log_failure("theme", result);
    }

    fn show_remaining(&mut self, phase: Phase, seconds: u32) {
        let result = self.sink.set_remaining(phase, &format_clock(seconds));
        log_failure("remaining time", result);
    }

    /// Controls, emphasis and ambience all follow the active phase.
    fn refresh_controls(&mut self, state: &SessionState) {
        for phase in [Phase::Work, Phase::Break] {
            let result = self
                .sink
                .set_control(phase, ControlView::for_phase(state, phase));
            log_failure("control", result);
        }
        let result = self.sink.set_emphasis(state.active_phase);
        log_failure("emphasis", result);
        let result = self
            .sink
            .set_ambient(state.active_phase == Some(Phase::Break));
        log_failure("ambience", result);
    }

    /// Returns a reference to the sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Returns a mutable reference to the sink.
    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }
}

fn log_failure(what: &str, result: Result<(), DisplayError>) {
    if let Err(e) = result {
        warn!("Failed to update {}: {}", what, e);
    }
}
