//! Interactive dashboard: refreshes quotes on the configured interval and
//! accepts ledger commands on stdin.
use super::ui;
use crate::core::config::RefreshConfig;
use crate::core::{LedgerCommand, RateSource, Session, TickOutcome};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

const HISTORY_ROWS: usize = 10;

/// How often the loop asks the scheduler for quotes. The scheduler decides
/// whether a tick actually fetches.
const TICK_PERIOD: Duration = Duration::from_secs(1);

const HELP: &str = "Commands:
  portfolio <amount>      replace the portfolio total (cartera)
  add <amount> <name>     add a deposited cheque
  remove <position>       remove the deposited cheque at <position>
  refresh                 fetch quotes now
  help                    show this help
  quit                    exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Ledger(LedgerCommand),
    Refresh,
    Help,
    Quit,
}

fn parse_amount(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != '_' && *c != ',')
        .collect();
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {text}"))
}

/// Parses one line typed by the operator. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Result<Option<WatchInput>> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };

    let input = match command.to_lowercase().as_str() {
        "portfolio" | "cartera" => {
            let amount = parts
                .next()
                .ok_or_else(|| anyhow!("Usage: portfolio <amount>"))?;
            WatchInput::Ledger(LedgerCommand::SetPortfolio(parse_amount(amount)?))
        }
        "add" | "deposit" => {
            let amount = parts
                .next()
                .ok_or_else(|| anyhow!("Usage: add <amount> <name>"))?;
            let amount = parse_amount(amount)?;
            let name = parts.collect::<Vec<_>>().join(" ");
            WatchInput::Ledger(LedgerCommand::AddDeposit { name, amount })
        }
        "remove" | "rm" => {
            let position = parts
                .next()
                .ok_or_else(|| anyhow!("Usage: remove <position>"))?;
            let position: usize = position
                .parse()
                .with_context(|| format!("Invalid position: {position}"))?;
            if position == 0 {
                bail!("Positions start at 1");
            }
            WatchInput::Ledger(LedgerCommand::RemoveDeposit(position - 1))
        }
        "refresh" | "r" => WatchInput::Refresh,
        "help" | "?" => WatchInput::Help,
        "quit" | "exit" | "q" => WatchInput::Quit,
        other => bail!("Unknown command: {other}. Type 'help' for the list of commands"),
    };
    Ok(Some(input))
}

/// Renders the whole dashboard from the session's current state.
pub fn render<S: RateSource>(session: &Session<S>) -> String {
    let last_update = session.last_update().map_or("Not updated".to_string(), |ts| {
        ts.with_timezone(&Local).format("%H:%M:%S").to_string()
    });

    let mut output = format!(
        "{}  {}\nLast update: {}\n\n",
        ui::style_text("Dólar ARS Dashboard", ui::StyleType::Title),
        Local::now().format("%d/%m/%Y"),
        last_update
    );

    match session.current_snapshot() {
        Some(snapshot) => output.push_str(&snapshot.display_as_table()),
        None => output.push_str(&ui::style_text(
            "Could not load quotes yet. Check your connection or type 'refresh'.",
            ui::StyleType::Error,
        )),
    }

    if !session.history().is_empty() {
        output.push_str("\n\n");
        output.push_str(&session.history().display_as_table(HISTORY_ROWS));
    }

    output.push_str("\n\n");
    output.push_str(&session.ledger_state().display_as_table());
    output
}

fn show<S: RateSource>(session: &Session<S>, status: Option<String>) {
    ui::print_separator();
    println!("{}", render(session));
    if let Some(status) = status {
        println!("\n{status}");
    }
}

async fn tick_and_show<S: RateSource>(session: &mut Session<S>, always_show: bool) {
    match session.tick(Utc::now()).await {
        TickOutcome::Fresh { changed, .. } if changed || always_show => show(session, None),
        TickOutcome::Fresh { .. } => debug!("Quotes unchanged, skipping redraw"),
        TickOutcome::Cached(_) if always_show => show(session, None),
        TickOutcome::Cached(_) => {}
        TickOutcome::Stale { error, .. } => {
            let message = format!("No fresh data: {error}. Showing last known quotes.");
            show(session, Some(ui::style_text(&message, ui::StyleType::Error)));
        }
    }
}

fn refresh_ticker() -> Interval {
    let mut ticker = tokio::time::interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

pub async fn run<S: RateSource>(mut session: Session<S>, config: &RefreshConfig) -> Result<()> {
    info!(interval_secs = config.interval_secs, "Starting watch loop");
    let mut ticker = refresh_ticker();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");

    loop {
        tokio::select! {
            _ = ticker.tick() => tick_and_show(&mut session, false).await,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    debug!("stdin closed, leaving watch loop");
                    break;
                };
                match parse_input(&line) {
                    Ok(None) => {}
                    Ok(Some(WatchInput::Quit)) => break,
                    Ok(Some(WatchInput::Help)) => println!("{HELP}"),
                    Ok(Some(WatchInput::Refresh)) => {
                        session.force_refresh();
                        tick_and_show(&mut session, true).await;
                    }
                    Ok(Some(WatchInput::Ledger(command))) => match session.mutate_ledger(command) {
                        // Mutations raise the refresh signal, so this tick refetches
                        Ok(_) => tick_and_show(&mut session, true).await,
                        Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                    },
                    Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FetchError, Quote, QuoteKind, QuoteSnapshot};
    use async_trait::async_trait;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_ledger_commands() {
        assert_eq!(
            parse_input("portfolio 150000").unwrap(),
            Some(WatchInput::Ledger(LedgerCommand::SetPortfolio(dec!(150000))))
        );
        assert_eq!(
            parse_input("cartera $1,500,000.50").unwrap(),
            Some(WatchInput::Ledger(LedgerCommand::SetPortfolio(dec!(1500000.50))))
        );
        assert_eq!(
            parse_input("add 5000 Cheque A").unwrap(),
            Some(WatchInput::Ledger(LedgerCommand::AddDeposit {
                name: "Cheque A".to_string(),
                amount: dec!(5000),
            }))
        );
        assert_eq!(
            parse_input("remove 2").unwrap(),
            Some(WatchInput::Ledger(LedgerCommand::RemoveDeposit(1)))
        );
    }

    #[test]
    fn test_parse_negative_amount_reaches_ledger_validation() {
        assert_eq!(
            parse_input("portfolio -1").unwrap(),
            Some(WatchInput::Ledger(LedgerCommand::SetPortfolio(dec!(-1))))
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse_input("").unwrap(), None);
        assert_eq!(parse_input("   ").unwrap(), None);
        assert_eq!(parse_input("REFRESH").unwrap(), Some(WatchInput::Refresh));
        assert_eq!(parse_input("help").unwrap(), Some(WatchInput::Help));
        assert_eq!(parse_input("q").unwrap(), Some(WatchInput::Quit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_wakes_every_second() {
        let mut ticker = refresh_ticker();
        let start = tokio::time::Instant::now();

        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        ticker.tick().await;
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_input("remove 0").is_err());
        assert!(parse_input("remove x").is_err());
        assert!(parse_input("portfolio").is_err());
        assert!(parse_input("add abc Cheque").is_err());
        let err = parse_input("dance").unwrap_err();
        assert!(err.to_string().contains("Unknown command: dance"));
    }

    struct FixedSource;

    #[async_trait]
    impl RateSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
            Ok(QuoteSnapshot::new(
                at,
                "fixed",
                [Quote::new(QuoteKind::Blue, Some(1180.0), Some(1200.0))],
            ))
        }
    }

    #[tokio::test]
    async fn test_render_dashboard() {
        let mut session = Session::new(FixedSource, &RefreshConfig::default());
        let output = render(&session);
        assert!(output.contains("Not updated"));
        assert!(output.contains("Could not load quotes yet"));

        session.tick(Utc::now()).await;
        session
            .mutate_ledger(LedgerCommand::SetPortfolio(dec!(50000)))
            .unwrap();

        let output = render(&session);
        assert!(!output.contains("Not updated"));
        assert!(output.contains("$1,200.00"));
        assert!(output.contains("Sell Price History"));
        assert!(output.contains("$50,000"));
    }
}
