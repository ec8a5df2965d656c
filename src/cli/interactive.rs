//! Line commands of an interactive session.
//!
//! Each input line becomes one [`SessionLine`], which is applied through a
//! [`SessionHandle`]. Duration and theme changes are also persisted.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::prefs::{save_duration, save_theme, PreferenceStore};
use crate::session::{Command, SessionError, SessionHandle};
use crate::types::{Phase, Theme};

use super::display::Display;

/// Longest duration accepted on the command line, in minutes.
const MAX_MINUTES: u32 = 120;

// ============================================================================
// SessionLine
// ============================================================================

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLine {
    /// Start or pause a phase
    Toggle(Phase),
    Reset,
    /// Change the duration of a phase, in minutes
    SetMinutes(Phase, u32),
    Theme(Theme),
    Status,
    Help,
    Quit,
    /// Blank line
    Empty,
}

/// Parses one input line.
///
/// Returns a user-facing message for unknown commands and bad arguments.
pub fn parse_line(line: &str) -> Result<SessionLine, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(SessionLine::Empty);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("引数が多すぎます: {}", line.trim()));
    }

    match (head.to_ascii_lowercase().as_str(), arg) {
        ("w", None) => Ok(SessionLine::Toggle(Phase::Work)),
        ("b", None) => Ok(SessionLine::Toggle(Phase::Break)),
        ("r" | "reset", None) => Ok(SessionLine::Reset),
        ("s" | "status", None) => Ok(SessionLine::Status),
        ("h" | "help" | "?", None) => Ok(SessionLine::Help),
        ("q" | "quit" | "exit", None) => Ok(SessionLine::Quit),
        ("work", Some(minutes)) => Ok(SessionLine::SetMinutes(Phase::Work, parse_minutes(minutes)?)),
        ("break", Some(minutes)) => {
            Ok(SessionLine::SetMinutes(Phase::Break, parse_minutes(minutes)?))
        }
        ("theme", Some(name)) => Ok(SessionLine::Theme(name.parse()?)),
        ("work" | "break" | "theme", None) => {
            Err(format!("{} には値が必要です (h でヘルプ)", head))
        }
        _ => Err(format!("不明なコマンドです: {} (h でヘルプ)", line.trim())),
    }
}

fn parse_minutes(raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(minutes) if (1..=MAX_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(format!(
            "時間は1から{}の分数で指定してください: {}",
            MAX_MINUTES, raw
        )),
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Reads commands from `input` until `q` or end of input, then shuts the
/// session down.
pub async fn drive<R>(input: R, handle: SessionHandle, prefs: Arc<dyn PreferenceStore>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let result = loop {
        let line = match lines.next_line().await.context("入力の読み込みに失敗しました") {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };

        match parse_line(&line) {
            Ok(SessionLine::Quit) => break Ok(()),
            Ok(parsed) => {
                if let Err(e) = apply(parsed, &handle, prefs.as_ref()).await {
                    break Err(e);
                }
            }
            Err(message) => Display::show_error(&message),
        }
    };

    handle.shutdown();
    result
}

async fn apply(line: SessionLine, handle: &SessionHandle, prefs: &dyn PreferenceStore) -> Result<()> {
    debug!("Input: {:?}", line);
    match line {
        SessionLine::Toggle(phase) => {
            report(handle.command(Command::Toggle(phase)).await)?;
        }
        SessionLine::Reset => {
            report(handle.command(Command::Reset).await)?;
        }
        SessionLine::SetMinutes(phase, minutes) => {
            let seconds = minutes * 60;
            if report(handle.command(Command::SetDuration { phase, seconds }).await)? {
                if let Err(e) = save_duration(prefs, phase, seconds) {
                    warn!("Failed to save {} duration: {}", phase, e);
                }
                Display::show_duration_changed(phase, minutes);
            }
        }
        SessionLine::Theme(theme) => {
            handle.set_theme(theme)?;
            if let Err(e) = save_theme(prefs, theme) {
                warn!("Failed to save theme: {}", e);
            }
        }
        SessionLine::Status => {
            let state = handle.snapshot().await?;
            Display::show_status(&state);
        }
        SessionLine::Help => Display::show_session_help(),
        SessionLine::Quit | SessionLine::Empty => {}
    }
    Ok(())
}

/// Prints refused commands. Returns whether the command was applied.
fn report(result: Result<(), SessionError>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_user_error() => {
            Display::show_error(&e.to_string());
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Tests
// ============================================================================
