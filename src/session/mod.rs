//! Work/break session.
//!
//! - `controller`: synchronous state machine emitting [`SessionEvent`]s
//! - `runtime`: tokio loop driving ticks, auto-advance, tips, cues and display

pub mod controller;
mod error;
pub mod runtime;

pub use controller::{Command, SessionController, SessionEvent, ADVANCE_DELAY, TICK_PERIOD};
pub use error::SessionError;
pub use runtime::{SessionHandle, SessionInput, SessionRuntime};
