//! Rendering money amounts as text.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::currency::currency_for;

/// Format `amount` in the currency `code` with exactly two decimal places,
/// e.g. "$1,234.50" or "-€3.00".
///
/// The amount is rounded half to even before display. Unknown currency codes
/// are shown as a prefix, e.g. "XYZ 5.00".
pub fn format_currency(amount: Decimal, code: &str) -> String {
    let rounded = round_for_display(amount);

    render(rounded, code, 2)
}

/// Like [format_currency], but drops the decimal places when the rounded
/// amount is a whole number, e.g. "$5" instead of "$5.00".
pub fn format_currency_short(amount: Decimal, code: &str) -> String {
    let rounded = round_for_display(amount);
    let decimal_places = if rounded.fract().is_zero() { 0 } else { 2 };

    render(rounded, code, decimal_places)
}

fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

fn render(rounded: Decimal, code: &str, decimal_places: usize) -> String {
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.*}", decimal_places, rounded.abs());
    let (integer_part, fraction_part) = match digits.split_once('.') {
        Some((integer_part, fraction_part)) => (integer_part, Some(fraction_part)),
        None => (digits.as_str(), None),
    };

    let whole_units = rounded.abs().trunc().to_u64();
    let grouped = match (whole_units, get_thousands_separator_formatter()) {
        (Some(whole_units), Some(formatter)) => formatter.fmt_string(whole_units),
        _ => integer_part.to_owned(),
    };

    let mut text = format!("{sign}{}{grouped}", symbol_prefix(code));

    if let Some(fraction_part) = fraction_part {
        text.push('.');
        text.push_str(fraction_part);
    }

    text
}

fn symbol_prefix(code: &str) -> String {
    match currency_for(code) {
        // Letter symbols such as "CHF" or "kr" read better with a gap.
        Some(currency) if currency.symbol.ends_with(char::is_alphabetic) => {
            format!("{} ", currency.symbol)
        }
        Some(currency) => currency.symbol.to_owned(),
        None => format!("{code} "),
    }
}

fn get_thousands_separator_formatter() -> Option<&'static Formatter> {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    FORMATTER
        .get_or_init(|| {
            Formatter::new()
                .separator(',')
                .map(|formatter| formatter.precision(Precision::Decimals(0)))
                .inspect_err(|error| {
                    tracing::error!("could not create number formatter: {error:?}")
                })
                .ok()
        })
        .as_ref()
}
