//! Everything a view needs to show amounts in the user's display currency.

use rust_decimal::Decimal;

use crate::currency::{BASE_CURRENCY, RateTable, convert, format_currency, format_currency_short};

/// The exchange rates plus the base and display currencies.
///
/// Amounts are stored in the base currency and converted at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyContext {
    /// The cached exchange rates.
    pub rates: RateTable,
    /// The currency stored amounts are in.
    pub base: String,
    /// The currency amounts are shown in.
    pub display: String,
}

impl CurrencyContext {
    /// A context that displays amounts in `display`.
    pub fn new(rates: RateTable, display: &str) -> Self {
        Self {
            rates,
            base: BASE_CURRENCY.to_owned(),
            display: display.to_owned(),
        }
    }

    /// Convert an amount in the base currency to the display currency.
    pub fn to_display(&self, amount: Decimal) -> Decimal {
        convert(amount, &self.base, &self.display, &self.rates)
    }

    /// Convert and format an amount in the base currency, e.g. "€13.80".
    pub fn format(&self, amount: Decimal) -> String {
        format_currency(self.to_display(amount), &self.display)
    }

    /// Convert and format an amount, dropping ".00" for whole numbers.
    pub fn format_short(&self, amount: Decimal) -> String {
        format_currency_short(self.to_display(amount), &self.display)
    }
}

impl Default for CurrencyContext {
    fn default() -> Self {
        Self::new(RateTable::empty(), BASE_CURRENCY)
    }
}

#[cfg(test)]
mod currency_context_tests {
    use rust_decimal::Decimal;

    use crate::currency::{CurrencyContext, RateTable, rates::test_utils::rate_table};

    #[test]
    fn formats_in_display_currency() {
        let context = CurrencyContext::new(rate_table(&[("USD", 1.0), ("EUR", 0.5)]), "EUR");

        assert_eq!(context.format(Decimal::from(20)), "€10.00");
        assert_eq!(context.format_short(Decimal::from(20)), "€10");
    }

    #[test]
    fn falls_back_to_base_amount_without_rates() {
        let context = CurrencyContext::new(RateTable::empty(), "EUR");

        assert_eq!(context.to_display(Decimal::from(20)), Decimal::from(20));
        assert_eq!(context.format(Decimal::from(20)), "€20.00");
    }

    #[test]
    fn default_displays_base_currency() {
        let context = CurrencyContext::default();

        assert_eq!(context.format(Decimal::new(1599, 2)), "$15.99");
    }
}
