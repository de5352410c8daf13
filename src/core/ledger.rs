//! Manual cheque ledger: a portfolio total ("cartera") and the cheques already
//! deposited from it ("depositados").
//!
//! The derived total is `portfolio - sum(deposited)`. It is allowed to go
//! negative. Every successful mutation raises the [`RefreshSignal`] so the next
//! scheduler tick refetches quotes.
use crate::core::error::LedgerError;
use crate::core::scheduler::RefreshSignal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub name: String,
    pub amount: Decimal,
}

/// Mutations accepted by the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    SetPortfolio(Decimal),
    AddDeposit { name: String, amount: Decimal },
    /// Zero-based position in the entry list.
    RemoveDeposit(usize),
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub portfolio: Decimal,
    pub entries: Vec<LedgerEntry>,
    pub deposited_total: Decimal,
    pub derived_total: Decimal,
}

#[derive(Debug)]
pub struct Ledger {
    portfolio: Decimal,
    entries: Vec<LedgerEntry>,
    signal: RefreshSignal,
}

impl Ledger {
    pub fn new(signal: RefreshSignal) -> Self {
        Self {
            portfolio: Decimal::ZERO,
            entries: Vec::new(),
            signal,
        }
    }

    /// Replaces the portfolio total. Amounts are not accumulated.
    pub fn set_portfolio(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        info!(%amount, "Portfolio total updated");
        self.portfolio = amount;
        self.signal.raise();
        Ok(())
    }

    pub fn add_deposit(&mut self, name: &str, amount: Decimal) -> Result<(), LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidName);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        info!(name, %amount, "Deposit added");
        self.entries.push(LedgerEntry {
            name: name.to_string(),
            amount,
        });
        self.signal.raise();
        Ok(())
    }

    pub fn remove_deposit(&mut self, index: usize) -> Result<LedgerEntry, LedgerError> {
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        info!(name = %removed.name, amount = %removed.amount, "Deposit removed");
        self.signal.raise();
        Ok(removed)
    }

    pub fn apply(&mut self, command: LedgerCommand) -> Result<(), LedgerError> {
        debug!(?command, "Applying ledger command");
        match command {
            LedgerCommand::SetPortfolio(amount) => self.set_portfolio(amount),
            LedgerCommand::AddDeposit { name, amount } => self.add_deposit(&name, amount),
            LedgerCommand::RemoveDeposit(index) => self.remove_deposit(index).map(|_| ()),
        }
    }

    pub fn portfolio(&self) -> Decimal {
        self.portfolio
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn deposited_total(&self) -> Decimal {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    pub fn derived_total(&self) -> Decimal {
        self.portfolio - self.deposited_total()
    }

    pub fn state(&self) -> LedgerState {
        LedgerState {
            portfolio: self.portfolio,
            entries: self.entries.clone(),
            deposited_total: self.deposited_total(),
            derived_total: self.derived_total(),
        }
    }
}
