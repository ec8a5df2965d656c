//! ANSI terminal display.
//!
//! The two countdowns share one status line that is redrawn in place. Tips
//! and celebrations are printed on their own lines above it.

use std::io::Write;

use crate::types::{Phase, Theme};

use super::{ControlLabel, ControlStyle, ControlView, DisplayError, DisplaySink, TipView};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Accent and ambience colors of a theme.
struct Palette {
    accent: &'static str,
    ambient: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            accent: "\x1b[34m",
            ambient: "\x1b[35m",
        },
        Theme::Dark => Palette {
            accent: "\x1b[96m",
            ambient: "\x1b[95m",
        },
        Theme::Retro => Palette {
            accent: "\x1b[32m",
            ambient: "\x1b[92m",
        },
    }
}

/// Renders the session on a terminal (or any writer).
///
/// With `ansi` disabled every redraw becomes a plain line, which keeps
/// piped output readable.
pub struct TerminalDisplay<W: Write> {
    out: W,
    ansi: bool,
    theme: Theme,
    work_text: String,
    break_text: String,
    work_control: ControlView,
    break_control: ControlView,
    emphasis: Option<Phase>,
    ambient: bool,
}

impl<W: Write> TerminalDisplay<W> {
    /// Creates a display writing to `out`.
    pub fn new(out: W, ansi: bool) -> Self {
        let ready = ControlView {
            label: ControlLabel::Start,
            style: ControlStyle::Ready,
        };
        Self {
            out,
            ansi,
            theme: Theme::default(),
            work_text: String::new(),
            break_text: String::new(),
            work_control: ready,
            break_control: ready,
            emphasis: None,
            ambient: false,
        }
    }

    /// Returns the underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Builds the status line for both phases.
    pub fn status_line(&self) -> String {
        let work = self.segment(Phase::Work, &self.work_text, self.work_control);
        let rest = self.segment(Phase::Break, &self.break_text, self.break_control);
        let prefix = if self.ambient {
            if self.ansi {
                format!("{}~{} ", palette(self.theme).ambient, RESET)
            } else {
                "~ ".to_string()
            }
        } else {
            String::new()
        };
        format!("{}{}  {}", prefix, work, rest)
    }

    fn segment(&self, phase: Phase, text: &str, control: ControlView) -> String {
        let emphasized = self.emphasis == Some(phase);
        let marker = if emphasized { '>' } else { ' ' };
        let body = format!("{} {} {} [{}]", marker, phase.label(), text, control.label.as_str());

        if !self.ansi {
            return body;
        }
        if emphasized {
            format!("{}{}{}{}", BOLD, palette(self.theme).accent, body, RESET)
        } else if self.emphasis.is_some() {
            format!("{}{}{}", DIM, body, RESET)
        } else {
            body
        }
    }

    fn redraw(&mut self) -> Result<(), DisplayError> {
        let line = self.status_line();
        if self.ansi {
            write!(self.out, "{}{}", CLEAR_LINE, line)?;
        } else {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Prints `lines` above the status line, then redraws it.
    fn print_block(&mut self, lines: &[String]) -> Result<(), DisplayError> {
        if self.ansi {
            write!(self.out, "{}", CLEAR_LINE)?;
        }
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        self.redraw()
    }

    fn accent(&self, text: &str) -> String {
        if self.ansi {
            format!("{}{}{}", palette(self.theme).accent, text, RESET)
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn set_remaining(&mut self, phase: Phase, text: &str) -> Result<(), DisplayError> {
        match phase {
            Phase::Work => self.work_text = text.to_string(),
            Phase::Break => self.break_text = text.to_string(),
        }
        self.redraw()
    }

    fn set_control(&mut self, phase: Phase, view: ControlView) -> Result<(), DisplayError> {
        match phase {
            Phase::Work => self.work_control = view,
            Phase::Break => self.break_control = view,
        }
        Ok(())
    }

    fn set_emphasis(&mut self, active: Option<Phase>) -> Result<(), DisplayError> {
        self.emphasis = active;
        Ok(())
    }

    fn set_ambient(&mut self, on: bool) -> Result<(), DisplayError> {
        self.ambient = on;
        self.redraw()
    }

    fn set_tip(&mut self, tip: &TipView) -> Result<(), DisplayError> {
        let lines = match tip {
            TipView::Loading => vec!["ヒント: 読み込み中...".to_string()],
            TipView::Remote { text } => vec![self.accent(&format!("ヒント: {}", text))],
            TipView::Fallback { text, caption } => vec![
                self.accent(&format!("ヒント: {}", text)),
                format!("  ({})", caption),
            ],
            TipView::Unconfigured { text, hint } => vec![
                self.accent(&format!("ヒント: {}", text)),
                format!("  設定: {}", hint),
            ],
            TipView::CredentialProblem { message, hint } => vec![
                format!("! {}", message),
                format!("  設定: {}", hint),
            ],
        };
        self.print_block(&lines)
    }

    fn celebrate(&mut self, phase: Phase) -> Result<(), DisplayError> {
        let message = match phase {
            Phase::Work => "*** 作業完了! 休憩しましょう ***",
            Phase::Break => "*** 休憩終了! 作業に戻りましょう ***",
        };
        let line = self.accent(message);
        self.print_block(&[line])
    }

    fn set_theme(&mut self, theme: Theme) -> Result<(), DisplayError> {
        self.theme = theme;
        self.redraw()
    }
}
