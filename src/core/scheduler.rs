//! Time-based refresh policy.
//!
//! The scheduler never runs on its own: the presentation loop calls
//! [`RefreshScheduler::tick`] and the scheduler answers with either a fresh
//! snapshot, the cached one, or the last known one when the fetch failed.
use crate::core::error::FetchError;
use crate::core::history::HistoryBuffer;
use crate::core::quote::{QuoteSnapshot, RateSource};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

pub const DEFAULT_REFRESH_INTERVAL_SECS: i64 = 60;

/// Forced-refresh flag shared between the ledger and the scheduler.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal(Arc<AtomicBool>);

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A fetch ran and succeeded. `changed` is false when prices match the previous snapshot.
    Fresh {
        snapshot: QuoteSnapshot,
        changed: bool,
    },
    /// The interval has not elapsed; no network activity.
    Cached(QuoteSnapshot),
    /// A fetch ran and failed. `last_known` is `None` until the first success.
    Stale {
        last_known: Option<QuoteSnapshot>,
        error: FetchError,
    },
}

impl TickOutcome {
    /// The snapshot the presentation layer should display, if any.
    pub fn snapshot(&self) -> Option<&QuoteSnapshot> {
        match self {
            TickOutcome::Fresh { snapshot, .. } | TickOutcome::Cached(snapshot) => Some(snapshot),
            TickOutcome::Stale { last_known, .. } => last_known.as_ref(),
        }
    }
}

pub struct RefreshScheduler<S: RateSource> {
    source: S,
    interval: Duration,
    last_update: Option<DateTime<Utc>>,
    last_snapshot: Option<QuoteSnapshot>,
    history: HistoryBuffer,
    signal: RefreshSignal,
}

impl<S: RateSource> RefreshScheduler<S> {
    pub fn new(source: S, interval: Duration, history: HistoryBuffer, signal: RefreshSignal) -> Self {
        Self {
            source,
            interval,
            last_update: None,
            last_snapshot: None,
            history,
            signal,
        }
    }

    /// Whether the next tick at `now` would hit the network. Elapsed time is
    /// counted in whole epoch seconds.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_update {
            None => true,
            Some(last) => {
                self.signal.is_raised()
                    || now.timestamp() - last.timestamp() >= self.interval.num_seconds()
            }
        }
    }

    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let due = self.is_due(now);
        let forced = self.signal.take();

        if !due && let Some(snapshot) = &self.last_snapshot {
            return TickOutcome::Cached(snapshot.clone());
        }

        debug!(%now, forced, last_update = ?self.last_update, "Refreshing quotes");
        match self.source.fetch(now).await {
            Ok(snapshot) => {
                let changed = self
                    .last_snapshot
                    .as_ref()
                    .is_none_or(|previous| !previous.same_prices(&snapshot));
                info!(source = snapshot.source(), changed, "Quotes refreshed");

                self.last_update = Some(now);
                self.history.append(snapshot.clone());
                self.last_snapshot = Some(snapshot.clone());
                TickOutcome::Fresh { snapshot, changed }
            }
            Err(e) => {
                error!(error = %e, "Quote refresh failed, keeping last known snapshot");
                TickOutcome::Stale {
                    last_known: self.last_snapshot.clone(),
                    error: e,
                }
            }
        }
    }

    /// Makes the next tick fetch regardless of elapsed time.
    pub fn force_refresh(&self) {
        self.signal.raise();
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn current_snapshot(&self) -> Option<&QuoteSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}
