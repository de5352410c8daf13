//! Core business logic: quotes, refresh policy, history and ledger

pub mod config;
pub mod error;
pub mod history;
pub mod ledger;
pub mod log;
pub mod quote;
pub mod scheduler;
pub mod session;
pub mod spread;

// Re-export main types for cleaner imports
pub use error::{FetchError, LedgerError};
pub use history::HistoryBuffer;
pub use ledger::{Ledger, LedgerCommand, LedgerEntry, LedgerState};
pub use quote::{Quote, QuoteKind, QuoteSnapshot, RateSource};
pub use scheduler::{RefreshScheduler, RefreshSignal, TickOutcome};
pub use session::Session;
