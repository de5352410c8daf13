use super::ui;
use crate::core::spread::brecha;
use crate::core::{QuoteSnapshot, RateSource};
use anyhow::Result;
use chrono::{Local, Utc};
use comfy_table::Cell;

impl QuoteSnapshot {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Type"),
            ui::header_cell("Buy (ARS)"),
            ui::header_cell("Sell (ARS)"),
        ]);

        for quote in self.quotes() {
            table.add_row(vec![
                Cell::new(quote.kind.label()),
                ui::format_optional_cell(quote.buy, ui::format_price),
                ui::format_optional_cell(quote.sell, ui::format_price),
            ]);
        }

        let fetched_at = self.timestamp().with_timezone(&Local);
        let mut output = format!(
            "{}\n\n",
            ui::style_text("Current Prices (ARS)", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!(
                    "Source: {} at {}",
                    self.source(),
                    fetched_at.format("%d/%m/%Y %H:%M:%S")
                ),
                ui::StyleType::Subtle
            )
        ));

        if let Some(spread) = display_brecha(self) {
            output.push_str("\n\n");
            output.push_str(&spread);
        }

        output
    }
}

/// "HAY BRECHA" banner with spread and percentage, when cripto sells below blue.
pub fn display_brecha(snapshot: &QuoteSnapshot) -> Option<String> {
    let spread = brecha(snapshot)?;
    Some(format!(
        "{}\nSpread: {}\nPercentage: {:.2}%",
        ui::style_text("HAY BRECHA", ui::StyleType::Alert),
        ui::format_price(spread.amount),
        spread.percentage
    ))
}

/// Fetches once and prints the current quotes.
pub async fn run<S: RateSource>(source: &S) -> Result<()> {
    let spinner = ui::new_spinner("Fetching quotes...");
    let result = source.fetch(Utc::now()).await;
    spinner.finish_and_clear();

    let snapshot = result?;
    println!("{}", snapshot.display_as_table());
    Ok(())
}
