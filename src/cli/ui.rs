use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Alert,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Alert => style(text).yellow().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Right-aligned ARS amount, red when negative.
pub fn amount_cell(amount: Decimal) -> Cell {
    let cell = Cell::new(format_ars(amount)).set_alignment(CellAlignment::Right);
    if amount < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an ARS amount with thousands separators, e.g. `$1,250,000` or
/// `-$300.50`. Cents are shown only when present.
pub fn format_ars(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let cents = frac_part.trim_end_matches('0');
    if cents.is_empty() {
        format!("{sign}${}", group_thousands(int_part))
    } else {
        format!("{sign}${}.{:0<2}", group_thousands(int_part), cents)
    }
}

/// Formats a quote price with two decimals, e.g. `$1,225.50`.
pub fn format_price(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    let text = format!("{:.2}", price.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Creates a spinner shown while quotes are being fetched.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_ars() {
        assert_eq!(format_ars(dec!(0)), "$0");
        assert_eq!(format_ars(dec!(999)), "$999");
        assert_eq!(format_ars(dec!(5000)), "$5,000");
        assert_eq!(format_ars(dec!(1250000)), "$1,250,000");
        assert_eq!(format_ars(dec!(40000.50)), "$40,000.50");
        assert_eq!(format_ars(dec!(12.5)), "$12.50");
        assert_eq!(format_ars(dec!(100.00)), "$100");
        assert_eq!(format_ars(dec!(-30000.50)), "-$30,000.50");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1225.5), "$1,225.50");
        assert_eq!(format_price(950.0), "$950.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
    }
}
