//! Currencies, exchange rates and money formatting.
//!
//! Subscription costs are stored in the base currency ([BASE_CURRENCY]) and
//! converted to the user's display currency when rendered, using a cached
//! [RateTable] that is refreshed from a remote rate API.

mod catalog;
mod context;
mod db;
mod fetch;
mod format;
mod rates;
mod refresh;

pub use catalog::{BASE_CURRENCY, Currency, SUPPORTED_CURRENCIES, currency_for};
pub use context::CurrencyContext;
pub use db::{create_exchange_rate_tables, get_rate_table, get_rates_last_updated, save_rate_table};
pub use fetch::{DEFAULT_RATES_URL, fetch_rates};
pub use format::{format_currency, format_currency_short};
pub use rates::{RateTable, convert};
pub use refresh::{refresh_rates, spawn_rate_refresh_task};

#[cfg(test)]
pub(crate) use rates::test_utils;
