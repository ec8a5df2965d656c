//! Display utilities for the pomotip CLI.
//!
//! This module provides formatted output for:
//! - One-shot tips
//! - API key, theme and duration settings
//! - Session status and help
//! - Error messages

use crate::display::TipView;
use crate::types::{format_clock, Phase, SessionConfig, SessionState, SessionStatus, Theme};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a tip fetched by the `tip` command.
    pub fn show_tip(view: &TipView) {
        for line in Self::format_tip(view) {
            println!("{}", line);
        }
    }

    /// Shows a success message for storing an API key.
    pub fn show_key_saved(masked: &str) {
        println!("* APIキーを保存しました: {}", masked);
    }

    /// Shows a success message for removing the API key.
    pub fn show_key_cleared() {
        println!("* APIキーを削除しました");
    }

    /// Shows the stored API key, already masked.
    pub fn show_key(masked: Option<&str>) {
        match masked {
            Some(masked) => println!("APIキー: {}", masked),
            None => println!("APIキーは設定されていません"),
        }
    }

    /// Shows the current theme and the available ones.
    pub fn show_theme(theme: Theme) {
        let names: Vec<&str> = Theme::ALL.iter().map(Theme::as_str).collect();
        println!("テーマ: {}", theme);
        println!("  選択肢: {}", names.join(" / "));
    }

    /// Shows a success message for a theme change.
    pub fn show_theme_saved(theme: Theme) {
        println!("* テーマを {} に変更しました", theme);
    }

    /// Shows the configured durations.
    pub fn show_durations(config: &SessionConfig) {
        println!("作業時間: {}", format_clock(config.work_seconds));
        println!("休憩時間: {}", format_clock(config.break_seconds));
    }

    /// Shows a success message for saved durations.
    pub fn show_durations_saved(config: &SessionConfig) {
        println!("* 時間設定を保存しました");
        Self::show_durations(config);
    }

    /// Shows a success message for a duration change during a session.
    pub fn show_duration_changed(phase: Phase, minutes: u32) {
        println!("* {}時間を{}分に変更しました", phase.label(), minutes);
    }

    /// Shows the session status.
    pub fn show_status(state: &SessionState) {
        println!();
        println!("状態: {}", Self::status_label(state.status()));
        println!("作業: {}", format_clock(state.work_remaining_seconds));
        println!("休憩: {}", format_clock(state.break_remaining_seconds));
    }

    /// Shows the commands available during a session.
    pub fn show_session_help() {
        println!();
        println!("コマンド:");
        println!("  w          作業タイマーの開始 / 一時停止");
        println!("  b          休憩タイマーの開始 / 一時停止");
        println!("  r          リセット");
        println!("  work <分>  作業時間を変更 (1-120)");
        println!("  break <分> 休憩時間を変更 (1-120)");
        println!("  theme <名> テーマを変更 (light / dark / retro)");
        println!("  s          状態を表示");
        println!("  h          このヘルプを表示");
        println!("  q          終了");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Returns the user-facing label of a status.
    pub fn status_label(status: SessionStatus) -> &'static str {
        match status {
            SessionStatus::Idle => "待機中",
            SessionStatus::WorkRunning => "作業中",
            SessionStatus::WorkPaused => "作業一時停止中",
            SessionStatus::BreakRunning => "休憩中",
            SessionStatus::BreakPaused => "休憩一時停止中",
        }
    }

    /// Formats a tip panel as plain lines.
    pub fn format_tip(view: &TipView) -> Vec<String> {
        match view {
            TipView::Loading => vec!["ヒントを読み込み中...".to_string()],
            TipView::Remote { text } => vec![text.clone()],
            TipView::Fallback { text, caption } => {
                vec![text.clone(), format!("  ({})", caption)]
            }
            TipView::Unconfigured { text, hint } => {
                vec![text.clone(), format!("  設定: {}", hint)]
            }
            TipView::CredentialProblem { message, hint } => {
                vec![format!("! {}", message), format!("  設定: {}", hint)]
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Format Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;

        #[test]
        fn test_status_labels() {
            assert_eq!(Display::status_label(SessionStatus::Idle), "待機中");
            assert_eq!(Display::status_label(SessionStatus::WorkRunning), "作業中");
            assert_eq!(
                Display::status_label(SessionStatus::BreakPaused),
                "休憩一時停止中"
            );
        }

        #[test]
        fn test_format_remote_tip() {
            let lines = Display::format_tip(&TipView::Remote {
                text: "Roll your shoulders".into(),
            });
            assert_eq!(lines, vec!["Roll your shoulders".to_string()]);
        }

        #[test]
        fn test_format_fallback_tip_has_caption() {
            let lines = Display::format_tip(&TipView::Fallback {
                text: "tip".into(),
                caption: "offline".into(),
            });
            assert_eq!(lines.len(), 2);
            assert!(lines[1].contains("offline"));
        }

        #[test]
        fn test_format_unconfigured_tip_has_settings_hint() {
            let lines = Display::format_tip(&TipView::Unconfigured {
                text: "tip".into(),
                hint: "key set".into(),
            });
            assert_eq!(lines[0], "tip");
            assert!(lines[1].starts_with("  設定:"));
        }
    }

    // ------------------------------------------------------------------------
    // Display Output Tests
    // ------------------------------------------------------------------------

    mod display_tests {
        use super::*;

        #[test]
        fn test_show_functions_do_not_panic() {
            let config = SessionConfig::default();
            Display::show_key(Some("sk-...abcd"));
            Display::show_key(None);
            Display::show_theme(Theme::Retro);
            Display::show_durations(&config);
            Display::show_status(&SessionState::new(config));
            Display::show_session_help();
        }
    }
}
