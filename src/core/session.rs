//! Session-scoped state shared by the presentation layer.
use crate::core::config::RefreshConfig;
use crate::core::error::LedgerError;
use crate::core::history::HistoryBuffer;
use crate::core::ledger::{Ledger, LedgerCommand, LedgerState};
use crate::core::quote::{QuoteSnapshot, RateSource};
use crate::core::scheduler::{RefreshScheduler, RefreshSignal, TickOutcome};
use chrono::{DateTime, Utc};

/// Owns the refresh scheduler, the rolling history and the ledger for one
/// running dashboard. The ledger and the scheduler share a [`RefreshSignal`],
/// so any successful ledger mutation makes the next tick refetch.
pub struct Session<S: RateSource> {
    scheduler: RefreshScheduler<S>,
    ledger: Ledger,
}

impl<S: RateSource> Session<S> {
    pub fn new(source: S, config: &RefreshConfig) -> Self {
        let signal = RefreshSignal::new();
        let scheduler = RefreshScheduler::new(
            source,
            config.interval(),
            HistoryBuffer::new(config.history_capacity),
            signal.clone(),
        );
        Self {
            scheduler,
            ledger: Ledger::new(signal),
        }
    }

    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        self.scheduler.tick(now).await
    }

    pub fn current_snapshot(&self) -> Option<&QuoteSnapshot> {
        self.scheduler.current_snapshot()
    }

    pub fn history(&self) -> &HistoryBuffer {
        self.scheduler.history()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.scheduler.last_update()
    }

    pub fn ledger_state(&self) -> LedgerState {
        self.ledger.state()
    }

    pub fn mutate_ledger(&mut self, command: LedgerCommand) -> Result<LedgerState, LedgerError> {
        self.ledger.apply(command)?;
        Ok(self.ledger.state())
    }

    /// Requests a refetch on the next tick without touching the ledger.
    pub fn force_refresh(&self) {
        self.scheduler.force_refresh();
    }
}
