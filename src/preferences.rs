//! User preferences stored as key/value pairs, currently just the display currency.

use rusqlite::{Connection, OptionalExtension};

use crate::{
    Error,
    currency::{BASE_CURRENCY, CurrencyContext, currency_for, get_rate_table},
};

const DISPLAY_CURRENCY_KEY: &str = "display_currency";

/// Create the preference table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_preference_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS preference (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the currency that amounts are shown in, defaults to the base currency.
///
/// A stored code that is no longer supported also falls back to the base currency.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_display_currency(connection: &Connection) -> Result<String, Error> {
    let code: Option<String> = connection
        .query_row(
            "SELECT value FROM preference WHERE key = ?1",
            [DISPLAY_CURRENCY_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match code {
        Some(code) if currency_for(&code).is_some() => Ok(code),
        Some(code) => {
            tracing::warn!("ignoring unsupported display currency {code}");
            Ok(BASE_CURRENCY.to_owned())
        }
        None => Ok(BASE_CURRENCY.to_owned()),
    }
}

/// Set the currency that amounts are shown in.
///
/// # Errors
/// Returns [Error::UnsupportedCurrency] if `code` is not in the currency
/// catalog, or [Error::SqlError] if the query fails.
pub fn set_display_currency(code: &str, connection: &Connection) -> Result<(), Error> {
    let currency = currency_for(code).ok_or_else(|| Error::UnsupportedCurrency(code.to_owned()))?;

    connection.execute(
        "INSERT INTO preference (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (DISPLAY_CURRENCY_KEY, currency.code),
    )?;

    Ok(())
}

/// Load the stored exchange rates and display currency.
///
/// # Errors
/// Returns [Error::SqlError] if either query fails.
pub fn get_currency_context(connection: &Connection) -> Result<CurrencyContext, Error> {
    let rates = get_rate_table(connection)?;
    let display = get_display_currency(connection)?;

    Ok(CurrencyContext::new(rates, &display))
}

#[cfg(test)]
mod preference_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        currency::{create_exchange_rate_tables, save_rate_table, test_utils::rate_table},
        preferences::{
            create_preference_table, get_currency_context, get_display_currency,
            set_display_currency,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_preference_table(&connection).unwrap();
        create_exchange_rate_tables(&connection).unwrap();
        connection
    }

    #[test]
    fn display_currency_defaults_to_usd() {
        let connection = get_test_connection();

        assert_eq!(get_display_currency(&connection), Ok("USD".to_owned()));
    }

    #[test]
    fn can_set_display_currency() {
        let connection = get_test_connection();

        set_display_currency("EUR", &connection).unwrap();
        set_display_currency("JPY", &connection).unwrap();

        assert_eq!(get_display_currency(&connection), Ok("JPY".to_owned()));
    }

    #[test]
    fn rejects_unsupported_currency() {
        let connection = get_test_connection();

        assert_eq!(
            set_display_currency("XYZ", &connection),
            Err(Error::UnsupportedCurrency("XYZ".to_owned()))
        );
        assert_eq!(get_display_currency(&connection), Ok("USD".to_owned()));
    }

    #[test]
    fn ignores_stored_unsupported_currency() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO preference (key, value) VALUES ('display_currency', 'XYZ')",
                (),
            )
            .unwrap();

        assert_eq!(get_display_currency(&connection), Ok("USD".to_owned()));
    }

    #[test]
    fn currency_context_uses_stored_rates() {
        let connection = get_test_connection();
        save_rate_table(&rate_table(&[("USD", 1.0), ("GBP", 0.5)]), &connection).unwrap();
        set_display_currency("GBP", &connection).unwrap();

        let context = get_currency_context(&connection).unwrap();

        assert_eq!(context.display, "GBP");
        assert_eq!(context.rates.rate("GBP"), Some(0.5));
    }
}
