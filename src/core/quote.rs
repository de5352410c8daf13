//! Quote abstractions and core types

use crate::core::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The exchange-rate variants tracked by the dashboard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteKind {
    Blue,
    Oficial,
    Mep,
    Ccl,
    Cripto,
}

impl QuoteKind {
    pub const ALL: [QuoteKind; 5] = [
        QuoteKind::Blue,
        QuoteKind::Oficial,
        QuoteKind::Mep,
        QuoteKind::Ccl,
        QuoteKind::Cripto,
    ];

    /// Human readable label used in tables and charts.
    pub fn label(&self) -> &'static str {
        match self {
            QuoteKind::Blue => "Dólar Blue",
            QuoteKind::Oficial => "Dólar Oficial",
            QuoteKind::Mep => "Dólar MEP",
            QuoteKind::Ccl => "Dólar CCL",
            QuoteKind::Cripto => "Dólar Cripto",
        }
    }

    fn index(&self) -> usize {
        match self {
            QuoteKind::Blue => 0,
            QuoteKind::Oficial => 1,
            QuoteKind::Mep => 2,
            QuoteKind::Ccl => 3,
            QuoteKind::Cripto => 4,
        }
    }
}

impl Display for QuoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                QuoteKind::Blue => "blue",
                QuoteKind::Oficial => "oficial",
                QuoteKind::Mep => "mep",
                QuoteKind::Ccl => "ccl",
                QuoteKind::Cripto => "cripto",
            }
        )
    }
}

impl FromStr for QuoteKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(QuoteKind::Blue),
            "oficial" => Ok(QuoteKind::Oficial),
            "mep" => Ok(QuoteKind::Mep),
            "ccl" => Ok(QuoteKind::Ccl),
            "cripto" => Ok(QuoteKind::Cripto),
            _ => Err(anyhow::anyhow!("Invalid quote kind: {}", s)),
        }
    }
}

/// Buy and sell price for one kind. Either side may be missing upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub kind: QuoteKind,
    pub buy: Option<f64>,
    pub sell: Option<f64>,
}

impl Quote {
    pub fn new(kind: QuoteKind, buy: Option<f64>, sell: Option<f64>) -> Self {
        Self { kind, buy, sell }
    }

    pub fn empty(kind: QuoteKind) -> Self {
        Self::new(kind, None, None)
    }
}

/// All five quotes produced by a single successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    timestamp: DateTime<Utc>,
    source: String,
    quotes: [Quote; 5],
}

impl QuoteSnapshot {
    /// Builds a snapshot. Kinds missing from `quotes` are stored as empty
    /// quotes; when a kind repeats the last occurrence wins.
    pub fn new(
        timestamp: DateTime<Utc>,
        source: &str,
        quotes: impl IntoIterator<Item = Quote>,
    ) -> Self {
        let mut slots = QuoteKind::ALL.map(Quote::empty);
        for quote in quotes {
            slots[quote.kind.index()] = quote;
        }
        Self {
            timestamp,
            source: source.to_string(),
            quotes: slots,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Name of the provider that produced this snapshot.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn quote(&self, kind: QuoteKind) -> &Quote {
        &self.quotes[kind.index()]
    }

    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter()
    }

    /// True when every buy and sell price matches `other`, ignoring timestamp and source.
    pub fn same_prices(&self, other: &QuoteSnapshot) -> bool {
        self.quotes == other.quotes
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short provider name used in logs and snapshots.
    fn name(&self) -> &str;

    /// Fetches a fresh snapshot stamped with `at`.
    async fn fetch(&self, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_fills_missing_kinds() {
        let snapshot = QuoteSnapshot::new(
            Utc::now(),
            "test",
            [Quote::new(QuoteKind::Blue, Some(900.0), Some(950.0))],
        );

        assert_eq!(snapshot.quotes().count(), 5);
        assert_eq!(snapshot.quote(QuoteKind::Blue).buy, Some(900.0));
        assert_eq!(snapshot.quote(QuoteKind::Blue).sell, Some(950.0));
        for kind in [
            QuoteKind::Oficial,
            QuoteKind::Mep,
            QuoteKind::Ccl,
            QuoteKind::Cripto,
        ] {
            let quote = snapshot.quote(kind);
            assert_eq!(quote.kind, kind);
            assert!(quote.buy.is_none());
            assert!(quote.sell.is_none());
        }
    }

    #[test]
    fn test_snapshot_quotes_in_display_order() {
        let snapshot = QuoteSnapshot::new(
            Utc::now(),
            "test",
            [
                Quote::new(QuoteKind::Cripto, Some(1.0), Some(2.0)),
                Quote::new(QuoteKind::Blue, Some(3.0), Some(4.0)),
            ],
        );
        let kinds: Vec<_> = snapshot.quotes().map(|q| q.kind).collect();
        assert_eq!(kinds, QuoteKind::ALL.to_vec());
    }

    #[test]
    fn test_same_prices_ignores_timestamp() {
        let quotes = [Quote::new(QuoteKind::Mep, Some(1000.0), Some(1010.0))];
        let first = QuoteSnapshot::new(Utc::now(), "a", quotes);
        let second = QuoteSnapshot::new(Utc::now() + chrono::Duration::seconds(60), "b", quotes);
        assert!(first.same_prices(&second));

        let changed = QuoteSnapshot::new(
            Utc::now(),
            "a",
            [Quote::new(QuoteKind::Mep, Some(1000.0), Some(1020.0))],
        );
        assert!(!first.same_prices(&changed));
    }

    #[test]
    fn test_quote_kind_from_str() {
        assert_eq!("BLUE".parse::<QuoteKind>().unwrap(), QuoteKind::Blue);
        assert_eq!("ccl".parse::<QuoteKind>().unwrap(), QuoteKind::Ccl);
        assert!("bolsa".parse::<QuoteKind>().is_err());
        assert_eq!(QuoteKind::Oficial.to_string(), "oficial");
    }
}
