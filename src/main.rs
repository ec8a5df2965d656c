//! pomotip - a terminal work/break interval timer
//!
//! This tool alternates two countdowns:
//! - 25 minutes of focused work
//! - 5 minutes of break, with a short tip fetched for every break
//!
//! Durations, theme and the tip service API key are kept in a small JSON
//! preference file.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use pomotip::cli::{self, Cli, Commands, Display, DurationArgs, KeyAction, RunArgs};
use pomotip::display::{Presenter, TerminalDisplay, TipView};
use pomotip::prefs::{
    load_api_key, load_session_config, load_theme, resolve_preferences_path, save_duration,
    save_theme, JsonFilePreferenceStore, PreferenceStore, API_KEY_PREF,
};
use pomotip::session::SessionRuntime;
use pomotip::sound::try_create_player;
use pomotip::tips::{
    mask_api_key, random_offline_tip, validate_api_key, ChatCompletionTipProvider, TipProvider,
    TipServiceConfig,
};
use pomotip::types::Phase;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            1
        }
    };

    // A pending stdin read holds a blocking thread that runtime shutdown
    // would wait for.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let tip_config = TipServiceConfig::from_env().with_overrides(cli.endpoint, cli.model);

    match cli.command {
        Some(Commands::Run(args)) => {
            let store = open_store(cli.prefs)?;
            run_session(args, store, tip_config).await?;
        }
        Some(Commands::Tip) => {
            let store = open_store(cli.prefs)?;
            let provider = ChatCompletionTipProvider::new(tip_config, store);
            let result = provider.request_tip().await;
            Display::show_tip(&TipView::from_result(&result, random_offline_tip()));
        }
        Some(Commands::Key { action }) => {
            let store = open_store(cli.prefs)?;
            manage_key(action, store.as_ref())?;
        }
        Some(Commands::Theme { theme }) => {
            let store = open_store(cli.prefs)?;
            match theme {
                Some(theme) => {
                    save_theme(store.as_ref(), theme).context("テーマを保存できませんでした")?;
                    Display::show_theme_saved(theme);
                }
                None => Display::show_theme(load_theme(store.as_ref())),
            }
        }
        Some(Commands::Durations(args)) => {
            let store = open_store(cli.prefs)?;
            manage_durations(&args, store.as_ref())?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Opens the preference file.
fn open_store(explicit: Option<PathBuf>) -> Result<Arc<JsonFilePreferenceStore>> {
    let path = resolve_preferences_path(explicit).context("設定ファイルの場所を決定できません")?;
    Ok(Arc::new(JsonFilePreferenceStore::open(path)))
}

/// Handles `key set|clear|show`.
fn manage_key(action: KeyAction, store: &dyn PreferenceStore) -> Result<()> {
    match action {
        KeyAction::Set { key } => {
            let key = key.trim();
            validate_api_key(key)?;
            store
                .set(API_KEY_PREF, key)
                .context("APIキーを保存できませんでした")?;
            Display::show_key_saved(&mask_api_key(key));
        }
        KeyAction::Clear => {
            store
                .remove(API_KEY_PREF)
                .context("APIキーを削除できませんでした")?;
            Display::show_key_cleared();
        }
        KeyAction::Show => {
            let key = load_api_key(store).context("APIキーを読み込めませんでした")?;
            Display::show_key(key.as_deref().map(mask_api_key).as_deref());
        }
    }
    Ok(())
}

/// Handles `durations`: shows them, or saves the given ones.
fn manage_durations(args: &DurationArgs, store: &dyn PreferenceStore) -> Result<()> {
    if args.is_empty() {
        Display::show_durations(&load_session_config(store));
        return Ok(());
    }

    for (phase, minutes) in [(Phase::Work, args.work), (Phase::Break, args.break_minutes)] {
        if let Some(minutes) = minutes {
            save_duration(store, phase, minutes * 60)
                .with_context(|| format!("{}時間を保存できませんでした", phase.label()))?;
        }
    }
    Display::show_durations_saved(&load_session_config(store));
    Ok(())
}

/// Runs an interactive session on the terminal.
async fn run_session(
    args: RunArgs,
    store: Arc<JsonFilePreferenceStore>,
    tip_config: TipServiceConfig,
) -> Result<()> {
    let mut config = load_session_config(store.as_ref());
    if let Some(minutes) = args.durations.work {
        config.work_seconds = minutes * 60;
    }
    if let Some(minutes) = args.durations.break_minutes {
        config.break_seconds = minutes * 60;
    }
    let theme = args.theme.unwrap_or_else(|| load_theme(store.as_ref()));

    let prefs: Arc<dyn PreferenceStore> = store;
    let tips = Arc::new(ChatCompletionTipProvider::new(tip_config, Arc::clone(&prefs)));
    let ansi = std::io::stdout().is_terminal();
    let presenter = Presenter::new(TerminalDisplay::new(std::io::stdout(), ansi));

    let mut runtime = SessionRuntime::new(config, presenter, tips).with_theme(theme);
    if !args.no_sound {
        if let Some(player) = try_create_player(false) {
            runtime = runtime.with_sound(player);
        }
    }
    let handle = runtime.handle();

    Display::show_session_help();

    let input = BufReader::new(tokio::io::stdin());
    let interactive = async {
        tokio::select! {
            result = cli::drive(input, handle.clone(), prefs) => result,
            _ = tokio::signal::ctrl_c() => {
                handle.shutdown();
                Ok(())
            }
        }
    };

    let (state, input_result) = tokio::join!(runtime.run(), interactive);
    let state = state?;
    input_result?;

    Display::show_status(&state);
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
