//! End-to-end tests of a running session.
//!
//! These tests drive a full `SessionRuntime` on tokio's paused clock:
//! - Complete work/break cycle with auto-advance
//! - Preemption and pause
//! - Duration changes while idle and while running
//! - Reset during the auto-advance delay
//! - Tip display policy and stale tip results

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use pomotip::display::{ControlLabel, Presenter, RecordingDisplay, TipView};
use pomotip::prefs::MemoryPreferenceStore;
use pomotip::session::{Command, SessionRuntime};
use pomotip::sound::{Cue, MockSoundPlayer};
use pomotip::tips::{ChatCompletionTipProvider, MockTipProvider, TipProvider, TipServiceConfig};
use pomotip::types::{Phase, SessionConfig, SessionStatus};

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    runtime: SessionRuntime<RecordingDisplay>,
    display: RecordingDisplay,
    sound: Arc<MockSoundPlayer>,
}

fn create_harness(config: SessionConfig, tips: Arc<dyn TipProvider>) -> Harness {
    let display = RecordingDisplay::new();
    let sound = Arc::new(MockSoundPlayer::new());
    let runtime = SessionRuntime::new(config, Presenter::with_seed(display.clone(), 42), tips)
        .with_sound(sound.clone());
    Harness {
        runtime,
        display,
        sound,
    }
}

fn seconds(work: u32, rest: u32) -> SessionConfig {
    SessionConfig::default()
        .with_work_seconds(work)
        .with_break_seconds(rest)
}

// ============================================================================
// Full cycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_complete_cycle_auto_advances_both_ways() {
    let tips = Arc::new(MockTipProvider::with_tip("Stretch your legs"));
    let Harness {
        runtime,
        display,
        sound,
    } = create_harness(seconds(2, 1), tips.clone());
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Toggle(Phase::Work)).await.unwrap();

        // Work finishes at 2s; break starts 500ms later
        sleep(Duration::from_millis(2200)).await;
        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.status(), SessionStatus::WorkPaused);
        assert_eq!(state.work_remaining_seconds, 2);

        sleep(Duration::from_millis(500)).await;
        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.status(), SessionStatus::BreakRunning);

        // Break finishes at 3.5s; work starts again at 4s
        sleep(Duration::from_millis(1500)).await;
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::WorkRunning);
    assert_eq!(state.work_remaining_seconds, 2);
    assert_eq!(state.break_remaining_seconds, 1);

    let view = display.snapshot();
    assert_eq!(view.celebrations, vec![Phase::Work, Phase::Break]);
    assert_eq!(
        view.tip_history,
        vec![
            TipView::Loading,
            TipView::Remote {
                text: "Stretch your legs".to_string()
            },
        ]
    );
    assert_eq!(view.emphasis, Some(Phase::Work));
    assert!(!view.ambient);

    assert_eq!(
        sound.get_play_calls(),
        vec![Cue::Start, Cue::Completion, Cue::Start, Cue::Start]
    );
    assert_eq!(tips.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completion_refills_display() {
    let Harness {
        runtime, display, ..
    } = create_harness(seconds(1, 300), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(1200)).await;
        handle.shutdown();
    });

    result.unwrap();
    let view = display.snapshot();
    assert_eq!(view.work_text, "0:01");
    assert_eq!(view.work_control.label, ControlLabel::Start);
    assert_eq!(view.celebrations, vec![Phase::Work]);
}

// ============================================================================
// Preemption and pause
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_starting_break_preempts_work() {
    let Harness {
        runtime, display, ..
    } = create_harness(SessionConfig::default(), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Toggle(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        handle.command(Command::Toggle(Phase::Break)).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::BreakRunning);
    assert_eq!(state.work_remaining_seconds, 1498);
    assert_eq!(state.break_remaining_seconds, 299);

    let view = display.snapshot();
    assert_eq!(view.work_text, "24:58");
    assert_eq!(view.break_text, "4:59");
    assert_eq!(view.work_control.label, ControlLabel::Start);
    assert_eq!(view.break_control.label, ControlLabel::Pause);
    assert_eq!(view.emphasis, Some(Phase::Break));
    assert!(view.ambient);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_pauses_and_resumes() {
    let Harness { runtime, sound, .. } =
        create_harness(SessionConfig::default(), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Toggle(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        handle.command(Command::Toggle(Phase::Work)).await.unwrap();
        sleep(Duration::from_secs(30)).await;
        handle.command(Command::Toggle(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::WorkRunning);
    assert_eq!(state.work_remaining_seconds, 1498);
    assert_eq!(sound.count_of(Cue::Start), 2);
}

// ============================================================================
// Durations
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_set_duration_while_idle_updates_display() {
    let Harness {
        runtime, display, ..
    } = create_harness(seconds(600, 300), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle
            .command(Command::SetDuration {
                phase: Phase::Work,
                seconds: 1500,
            })
            .await
            .unwrap();
        handle.shutdown();
    });

    result.unwrap();
    assert_eq!(display.snapshot().work_text, "25:00");
}

#[tokio::test(start_paused = true)]
async fn test_set_duration_while_running_keeps_display() {
    let Harness {
        runtime, display, ..
    } = create_harness(seconds(600, 300), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        handle
            .command(Command::SetDuration {
                phase: Phase::Work,
                seconds: 1500,
            })
            .await
            .unwrap();
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.config.work_seconds, 1500);
    assert_eq!(display.snapshot().work_text, "9:59");
}

// ============================================================================
// Reset
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reset_during_advance_delay_cancels_advance() {
    let Harness {
        runtime, display, ..
    } = create_harness(seconds(1, 300), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(1200)).await;
        handle.command(Command::Reset).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::Idle);
    assert_eq!(state.break_remaining_seconds, 300);

    let view = display.snapshot();
    assert_eq!(view.emphasis, None);
    assert!(view.tip_history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pause_during_advance_delay_keeps_session_paused() {
    let Harness {
        runtime, display, ..
    } = create_harness(seconds(1, 300), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(1200)).await;
        handle.command(Command::Pause).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::WorkPaused);
    assert_eq!(state.break_remaining_seconds, 300);
    assert!(display.snapshot().tip_history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reset_restores_both_countdowns() {
    let Harness {
        runtime, display, ..
    } = create_harness(SessionConfig::default(), Arc::new(MockTipProvider::with_tip("x")));
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Work)).await.unwrap();
        sleep(Duration::from_millis(3500)).await;
        handle.command(Command::Start(Phase::Break)).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        handle.command(Command::Reset).await.unwrap();
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::Idle);
    let view = display.snapshot();
    assert_eq!(view.work_text, "25:00");
    assert_eq!(view.break_text, "5:00");
    assert_eq!(view.break_control.label, ControlLabel::Start);
}

// ============================================================================
// Tips
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_tip_resolving_after_break_ended_is_not_shown() {
    let tips = Arc::new(MockTipProvider::with_tip("late tip").delayed(Duration::from_secs(3)));
    let Harness {
        runtime, display, ..
    } = create_harness(seconds(300, 1), tips.clone());
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Break)).await.unwrap();
        sleep(Duration::from_millis(3500)).await;
        handle.shutdown();
    });

    let state = result.unwrap();
    assert_eq!(state.status(), SessionStatus::WorkRunning);
    assert_eq!(tips.call_count(), 1);

    let view = display.snapshot();
    assert_eq!(view.tip_history, vec![TipView::Loading]);
}

#[tokio::test(start_paused = true)]
async fn test_resuming_break_does_not_refetch() {
    let tips = Arc::new(MockTipProvider::with_tip("x"));
    let Harness { runtime, .. } = create_harness(SessionConfig::default(), tips.clone());
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Toggle(Phase::Break)).await.unwrap();
        handle.command(Command::Toggle(Phase::Break)).await.unwrap();
        handle.command(Command::Toggle(Phase::Break)).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        handle.shutdown();
    });

    result.unwrap();
    assert_eq!(tips.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_api_key_shows_offline_tip_without_caption() {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let tips = Arc::new(ChatCompletionTipProvider::new(
        TipServiceConfig::default(),
        prefs,
    ));
    let Harness {
        runtime, display, ..
    } = create_harness(SessionConfig::default(), tips);
    let handle = runtime.handle();

    let (result, _) = tokio::join!(runtime.run(), async move {
        handle.command(Command::Start(Phase::Break)).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        handle.shutdown();
    });

    result.unwrap();
    match display.snapshot().tip {
        Some(TipView::Unconfigured { text, hint }) => {
            assert!(!text.is_empty());
            assert!(hint.contains("key set"));
        }
        other => panic!("unexpected tip: {:?}", other),
    }
}
