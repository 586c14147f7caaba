//! Exchange rate tables and currency conversion.

use std::collections::HashMap;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::currency::BASE_CURRENCY;

/// How long a rate table stays fresh after it was last updated.
pub const RATE_TABLE_MAX_AGE: Duration = Duration::hours(24);

/// Exchange rates relative to a base currency.
///
/// A rate of `r` for a code means one unit of the base currency is worth `r`
/// units of that currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    /// The currency the rates are relative to, e.g. "USD".
    pub base: String,
    /// Rates keyed by three letter currency code.
    pub rates: HashMap<String, f64>,
    /// When the rates were fetched, `None` if never fetched.
    pub last_updated: Option<OffsetDateTime>,
}

/// Whether rates last updated at `last_updated` need refreshing at `now`.
pub(crate) fn rates_are_stale(last_updated: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    match last_updated {
        Some(last_updated) => now - last_updated >= RATE_TABLE_MAX_AGE,
        None => true,
    }
}

impl RateTable {
    /// A table with no rates, used before the first successful fetch.
    pub fn empty() -> Self {
        Self {
            base: BASE_CURRENCY.to_owned(),
            rates: HashMap::new(),
            last_updated: None,
        }
    }

    /// Whether the table should be refreshed.
    ///
    /// A table that has never been updated is always stale. Stale tables are
    /// still used for conversion until a fresh table is available.
    pub fn is_stale(&self, now: OffsetDateTime) -> bool {
        rates_are_stale(self.last_updated, now)
    }

    /// The rate for `code`, if the table has one.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Whether the table has no rates at all.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::empty()
    }
}

/// Convert `amount` from the currency `from` to the currency `to`.
///
/// Converting to the same currency returns `amount` exactly. If either
/// currency is missing from `rates`, or the rate for `from` is zero, the
/// amount is returned unchanged so that views can still render something
/// sensible before rates have been fetched.
pub fn convert(amount: Decimal, from: &str, to: &str, rates: &RateTable) -> Decimal {
    if from == to {
        return amount;
    }

    let (from_rate, to_rate) = match (rates.rate(from), rates.rate(to)) {
        (Some(from_rate), Some(to_rate)) => (from_rate, to_rate),
        _ => {
            tracing::debug!("no exchange rate for {from} -> {to}, showing unconverted amount");
            return amount;
        }
    };

    let (Some(from_rate), Some(to_rate)) =
        (Decimal::from_f64(from_rate), Decimal::from_f64(to_rate))
    else {
        tracing::debug!("exchange rate for {from} -> {to} is not a finite number");
        return amount;
    };

    if from_rate.is_zero() {
        tracing::debug!("exchange rate for {from} is zero, showing unconverted amount");
        return amount;
    }

    amount
        .checked_div(from_rate)
        .and_then(|base_amount| base_amount.checked_mul(to_rate))
        .unwrap_or_else(|| {
            tracing::debug!("converting {amount} {from} -> {to} overflowed");
            amount
        })
}


#[cfg(test)]
mod convert_tests {
    use rust_decimal::Decimal;

    use crate::currency::{RateTable, convert, rates::test_utils::rate_table};

    #[test]
    fn same_currency_is_exact_even_with_empty_table() {
        let amount = Decimal::new(123456789, 4);

        assert_eq!(convert(amount, "USD", "USD", &RateTable::empty()), amount);
        assert_eq!(convert(amount, "EUR", "EUR", &RateTable::empty()), amount);
    }

    #[test]
    fn converts_from_base() {
        let rates = rate_table(&[("USD", 1.0), ("EUR", 0.5)]);
        let amount = Decimal::new(1599, 2);

        assert_eq!(
            convert(amount, "USD", "EUR", &rates),
            amount * Decimal::new(5, 1)
        );
    }

    #[test]
    fn converts_between_non_base_currencies() {
        let rates = rate_table(&[("USD", 1.0), ("EUR", 0.5), ("GBP", 0.25)]);

        assert_eq!(
            convert(Decimal::from(10), "EUR", "GBP", &rates),
            Decimal::from(5)
        );
    }

    #[test]
    fn missing_code_returns_amount() {
        let rates = rate_table(&[("USD", 1.0)]);
        let amount = Decimal::new(1599, 2);

        assert_eq!(convert(amount, "USD", "EUR", &rates), amount);
        assert_eq!(convert(amount, "EUR", "USD", &rates), amount);
    }

    #[test]
    fn zero_from_rate_returns_amount() {
        let rates = rate_table(&[("USD", 1.0), ("EUR", 0.0)]);
        let amount = Decimal::new(1599, 2);

        assert_eq!(convert(amount, "EUR", "USD", &rates), amount);
    }

    #[test]
    fn non_finite_rate_returns_amount() {
        let rates = rate_table(&[("USD", 1.0), ("EUR", f64::NAN)]);
        let amount = Decimal::new(1599, 2);

        assert_eq!(convert(amount, "USD", "EUR", &rates), amount);
    }
}
