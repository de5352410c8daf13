use super::ui;
use crate::core::{HistoryBuffer, QuoteKind};
use chrono::Local;
use comfy_table::Cell;

impl HistoryBuffer {
    /// Sell prices of the `limit` most recent snapshots, oldest first.
    pub fn display_as_table(&self, limit: usize) -> String {
        let mut table = ui::new_styled_table();

        let mut header = vec![ui::header_cell("Time")];
        header.extend(QuoteKind::ALL.iter().map(|kind| ui::header_cell(kind.label())));
        table.set_header(header);

        let series: Vec<_> = QuoteKind::ALL
            .iter()
            .map(|kind| self.sell_series(*kind))
            .collect();
        for row in self.len().saturating_sub(limit)..self.len() {
            let (timestamp, _) = series[0][row];
            let mut cells = vec![Cell::new(
                timestamp.with_timezone(&Local).format("%H:%M:%S").to_string(),
            )];
            cells.extend(
                series
                    .iter()
                    .map(|column| ui::format_optional_cell(column[row].1, ui::format_price)),
            );
            table.add_row(cells);
        }

        format!(
            "{} {}\n\n{}",
            ui::style_text("Sell Price History (ARS)", ui::StyleType::Title),
            ui::style_text(
                &format!("{} of {} snapshots", self.len().min(limit), self.len()),
                ui::StyleType::Subtle
            ),
            table
        )
    }
}
