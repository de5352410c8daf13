//! Spread ("brecha") between the blue and cripto sell prices.
use crate::core::quote::{QuoteKind, QuoteSnapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    /// Blue sell minus cripto sell, in ARS.
    pub amount: f64,
    /// `amount` as a percentage of the blue sell price.
    pub percentage: f64,
}

/// Returns the spread when the cripto sell price is below the blue sell price.
pub fn brecha(snapshot: &QuoteSnapshot) -> Option<Spread> {
    let blue = snapshot.quote(QuoteKind::Blue).sell?;
    let cripto = snapshot.quote(QuoteKind::Cripto).sell?;

    if blue <= 0.0 || cripto >= blue {
        return None;
    }

    let amount = blue - cripto;
    Some(Spread {
        amount,
        percentage: amount / blue * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quote::Quote;
    use chrono::Utc;

    fn snapshot(blue: Option<f64>, cripto: Option<f64>) -> QuoteSnapshot {
        QuoteSnapshot::new(
            Utc::now(),
            "test",
            [
                Quote::new(QuoteKind::Blue, None, blue),
                Quote::new(QuoteKind::Cripto, None, cripto),
            ],
        )
    }

    #[test]
    fn test_brecha_when_cripto_below_blue() {
        let spread = brecha(&snapshot(Some(1000.0), Some(950.0))).unwrap();
        assert!((spread.amount - 50.0).abs() < 1e-9);
        assert!((spread.percentage - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_brecha_when_cripto_at_or_above_blue() {
        assert!(brecha(&snapshot(Some(1000.0), Some(1000.0))).is_none());
        assert!(brecha(&snapshot(Some(1000.0), Some(1100.0))).is_none());
    }

    #[test]
    fn test_no_brecha_when_price_missing() {
        assert!(brecha(&snapshot(None, Some(950.0))).is_none());
        assert!(brecha(&snapshot(Some(1000.0), None)).is_none());
    }
}
