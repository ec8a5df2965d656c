//! Break-time tips.
//!
//! Each break asks a [`TipProvider`] for one short tip. The provider either
//! returns text or a classified [`TipError`]; what the user sees for each
//! error is decided by the display layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TipProvider    │ ← async trait, object safe
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌────────────────────────────┐     ┌──────────────────┐
//! │ ChatCompletionTipProvider  │────▶│ PreferenceStore  │ (API key)
//! │  (reqwest, one POST)       │     └──────────────────┘
//! └────────────────────────────┘
//!          │ on failure
//!          ▼
//! ┌──────────────────┐
//! │  OFFLINE_TIPS    │ ← uniform random fallback
//! └──────────────────┘
//! ```

mod client;
mod config;
mod credential;
mod error;
mod offline;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

pub use client::{classify_status, parse_completion, ChatCompletionTipProvider};
pub use config::{TipServiceConfig, ENDPOINT_ENV, MODEL_ENV};
pub use credential::{mask_api_key, validate_api_key, API_KEY_PREFIX, MIN_API_KEY_LENGTH};
pub use error::{TipError, TipErrorKind};
pub use offline::{pick_offline_tip, random_offline_tip, OFFLINE_TIPS};

/// Outcome of one tip request.
pub type TipResult = Result<String, TipError>;

/// Source of break-time tips.
#[async_trait]
pub trait TipProvider: Send + Sync {
    /// Requests one tip.
    ///
    /// Implementations must not panic; every failure is a `TipError`.
    async fn request_tip(&self) -> TipResult;
}

/// Mock tip provider for testing.
///
/// Returns queued results in order, then the fallback result. An optional
/// delay is applied before every answer.
#[derive(Debug)]
pub struct MockTipProvider {
    queued: Mutex<VecDeque<TipResult>>,
    fallback: TipResult,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockTipProvider {
    /// Creates a provider that always answers `result`.
    #[must_use]
    pub fn always(result: TipResult) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: result,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a provider that answers a fixed tip.
    #[must_use]
    pub fn with_tip(text: impl Into<String>) -> Self {
        Self::always(Ok(text.into()))
    }

    /// Delays every answer by `delay`.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a result to be returned before the fallback.
    pub fn push(&self, result: TipResult) {
        self.queued.lock().unwrap().push_back(result);
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TipProvider for MockTipProvider {
    async fn request_tip(&self) -> TipResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let queued = self.queued.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}
