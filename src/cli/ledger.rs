use super::ui;
use crate::core::LedgerState;
use comfy_table::Cell;
use rust_decimal::Decimal;

impl LedgerState {
    pub fn display_as_table(&self) -> String {
        let mut output = format!(
            "{}\n\nPortfolio: {}\n",
            ui::style_text("Cheques", ui::StyleType::Title),
            ui::style_text(&ui::format_ars(self.portfolio), ui::StyleType::TotalLabel)
        );

        if self.entries.is_empty() {
            output.push_str(&ui::style_text(
                "No deposited cheques",
                ui::StyleType::Subtle,
            ));
        } else {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("#"),
                ui::header_cell("Deposited"),
                ui::header_cell("Amount (ARS)"),
            ]);
            for (i, entry) in self.entries.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(&entry.name),
                    ui::amount_cell(entry.amount),
                ]);
            }
            output.push_str(&table.to_string());
            output.push_str(&format!(
                "\nDeposited: {}",
                ui::style_text(
                    &ui::format_ars(self.deposited_total),
                    ui::StyleType::TotalLabel
                )
            ));
        }

        let total_style = if self.derived_total < Decimal::ZERO {
            ui::StyleType::Error
        } else {
            ui::StyleType::TotalValue
        };
        output.push_str(&format!(
            "\n\n{}: {} {}",
            ui::style_text("Total General (ARS)", ui::StyleType::TotalLabel),
            ui::style_text(&ui::format_ars(self.derived_total), total_style),
            ui::style_text("(portfolio - deposited)", ui::StyleType::Subtle)
        ));

        output
    }
}
