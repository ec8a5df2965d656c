//! CLI module for pomotip.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `interactive`: Line commands of a running session
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod interactive;

pub use commands::{Cli, Commands, DurationArgs, KeyAction, RunArgs};
pub use display::Display;
pub use interactive::{drive, parse_line, SessionLine};
