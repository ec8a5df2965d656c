//! Command definitions for the pomotip CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::Theme;

// ============================================================================
// CLI Structure
// ============================================================================

/// pomotip - work/break interval timer with break-time tips
#[derive(Parser, Debug)]
#[command(
    name = "pomotip",
    version,
    about = "休憩中にヒントを表示する作業/休憩インターバルタイマー",
    long_about = "ターミナル上で動作するシンプルな作業/休憩タイマー。\n\
                  休憩が始まるたびに、チップサービスから短いヒントを取得して表示します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preference file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Chat completion endpoint of the tip service
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Model requested from the tip service
    #[arg(long, global = true, value_name = "MODEL")]
    pub model: Option<String>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive work/break session
    Run(RunArgs),

    /// Fetch one tip and print it
    Tip,

    /// Manage the tip service API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Show or change the color theme
    Theme {
        /// New theme (light, dark, retro)
        #[arg(value_parser = parse_theme)]
        theme: Option<Theme>,
    },

    /// Show or change the saved durations
    Durations(DurationArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// API key operations
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Store a new API key
    Set {
        /// API key (starts with "sk-")
        key: String,
    },

    /// Remove the stored API key
    Clear,

    /// Show the stored API key (masked)
    Show,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub durations: DurationArgs,

    /// Disable sound cues
    #[arg(long)]
    pub no_sound: bool,

    /// Theme for this session (light, dark, retro)
    #[arg(long, value_parser = parse_theme)]
    pub theme: Option<Theme>,
}

/// Durations in minutes. Missing values keep the saved ones.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationArgs {
    /// Work duration in minutes (1-120)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub work: Option<u32>,

    /// Break duration in minutes (1-120)
    #[arg(
        short = 'b',
        long = "break",
        value_name = "BREAK",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub break_minutes: Option<u32>,
}

impl DurationArgs {
    /// Returns true if neither duration was given.
    pub fn is_empty(&self) -> bool {
        self.work.is_none() && self.break_minutes.is_none()
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a theme name.
fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse()
}

// ============================================================================
// Tests
// ============================================================================
