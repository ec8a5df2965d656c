//! Display sink that records what would be shown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::types::{Phase, Theme};

use super::{ControlLabel, ControlStyle, ControlView, DisplayError, DisplaySink, TipView};

/// Current content of a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedView {
    pub work_text: String,
    pub break_text: String,
    pub work_control: ControlView,
    pub break_control: ControlView,
    pub emphasis: Option<Phase>,
    pub ambient: bool,
    /// Current tip panel
    pub tip: Option<TipView>,
    /// Every tip panel shown, oldest first
    pub tip_history: Vec<TipView>,
    pub celebrations: Vec<Phase>,
    pub theme: Theme,
}

impl Default for RecordedView {
    fn default() -> Self {
        let ready = ControlView {
            label: ControlLabel::Start,
            style: ControlStyle::Ready,
        };
        Self {
            work_text: String::new(),
            break_text: String::new(),
            work_control: ready,
            break_control: ready,
            emphasis: None,
            ambient: false,
            tip: None,
            tip_history: Vec::new(),
            celebrations: Vec::new(),
            theme: Theme::default(),
        }
    }
}

impl RecordedView {
    /// Returns the remaining-time text of `phase`.
    pub fn remaining_text(&self, phase: Phase) -> &str {
        match phase {
            Phase::Work => &self.work_text,
            Phase::Break => &self.break_text,
        }
    }
}

/// Display sink for tests.
///
/// Clones share the same recording, so a test can keep one clone while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    view: Arc<Mutex<RecordedView>>,
    should_fail: Arc<AtomicBool>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail without recording anything.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns a copy of the current view.
    #[must_use]
    pub fn snapshot(&self) -> RecordedView {
        self.view.lock().unwrap().clone()
    }

    fn update(&self, apply: impl FnOnce(&mut RecordedView)) -> Result<(), DisplayError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DisplayError::Unavailable("simulated failure".to_string()));
        }
        apply(&mut self.view.lock().unwrap());
        Ok(())
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_remaining(&mut self, phase: Phase, text: &str) -> Result<(), DisplayError> {
        self.update(|view| match phase {
            Phase::Work => view.work_text = text.to_string(),
            Phase::Break => view.break_text = text.to_string(),
        })
    }

    fn set_control(&mut self, phase: Phase, control: ControlView) -> Result<(), DisplayError> {
        self.update(|view| match phase {
            Phase::Work => view.work_control = control,
            Phase::Break => view.break_control = control,
        })
    }

    fn set_emphasis(&mut self, active: Option<Phase>) -> Result<(), DisplayError> {
        self.update(|view| view.emphasis = active)
    }

    fn set_ambient(&mut self, on: bool) -> Result<(), DisplayError> {
        self.update(|view| view.ambient = on)
    }

    fn set_tip(&mut self, tip: &TipView) -> Result<(), DisplayError> {
        self.update(|view| {
            view.tip = Some(tip.clone());
            view.tip_history.push(tip.clone());
        })
    }

    fn celebrate(&mut self, phase: Phase) -> Result<(), DisplayError> {
        self.update(|view| view.celebrations.push(phase))
    }

    fn set_theme(&mut self, theme: Theme) -> Result<(), DisplayError> {
        self.update(|view| view.theme = theme)
    }
}
