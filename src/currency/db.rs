//! Caching exchange rates in the database.
//!
//! The most recently fetched rate table is kept so that amounts can still be
//! converted when the rate source is unreachable.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;

use crate::{Error, currency::RateTable};

/// Create the tables for the cached exchange rates.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_exchange_rate_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS exchange_rate (
            code TEXT PRIMARY KEY,
            rate REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS exchange_rate_metadata (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            base_code TEXT NOT NULL,
            last_updated TEXT NOT NULL
        );",
    )?;

    Ok(())
}

/// Replace the cached rates with `table`.
///
/// The rates and their metadata are written in a single SQL transaction, so
/// readers either see the old table or the new one.
///
/// # Errors
/// Returns [Error::SqlError] if the transaction fails.
pub fn save_rate_table(table: &RateTable, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute("DELETE FROM exchange_rate", [])?;

    {
        let mut statement =
            transaction.prepare("INSERT INTO exchange_rate (code, rate) VALUES (?1, ?2)")?;

        for (code, rate) in &table.rates {
            statement.execute((code, rate))?;
        }
    }

    let last_updated = table
        .last_updated
        .unwrap_or_else(OffsetDateTime::now_utc);

    transaction.execute(
        "INSERT INTO exchange_rate_metadata (id, base_code, last_updated) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET base_code = excluded.base_code, last_updated = excluded.last_updated",
        (&table.base, last_updated),
    )?;

    transaction.commit()?;

    Ok(())
}

/// Load the cached rates.
///
/// Returns [RateTable::empty] if rates have never been saved.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_rate_table(connection: &Connection) -> Result<RateTable, Error> {
    let metadata: Option<(String, OffsetDateTime)> = connection
        .query_row(
            "SELECT base_code, last_updated FROM exchange_rate_metadata WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((base, last_updated)) = metadata else {
        return Ok(RateTable::empty());
    };

    let rates = connection
        .prepare("SELECT code, rate FROM exchange_rate")?
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
        .collect::<Result<HashMap<_, _>, rusqlite::Error>>()?;

    Ok(RateTable {
        base,
        rates,
        last_updated: Some(last_updated),
    })
}

/// When the cached rates were last updated, if ever.
pub fn get_rates_last_updated(connection: &Connection) -> Result<Option<OffsetDateTime>, Error> {
    connection
        .query_row(
            "SELECT last_updated FROM exchange_rate_metadata WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

#[cfg(test)]
mod rate_table_db_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::currency::{
        RateTable, create_exchange_rate_tables, get_rate_table, get_rates_last_updated,
        rates::test_utils::rate_table, save_rate_table,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_exchange_rate_tables(&connection).expect("Could not create rate tables");
        connection
    }

    #[test]
    fn empty_database_returns_empty_table() {
        let connection = get_test_connection();

        let got = get_rate_table(&connection).unwrap();

        assert_eq!(got, RateTable::empty());
        assert_eq!(get_rates_last_updated(&connection), Ok(None));
    }

    #[test]
    fn saved_table_round_trips() {
        let connection = get_test_connection();
        let mut want = rate_table(&[("USD", 1.0), ("EUR", 0.92), ("JPY", 149.5)]);
        want.last_updated = Some(datetime!(2025-10-19 08:00 UTC));

        save_rate_table(&want, &connection).unwrap();
        let got = get_rate_table(&connection).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn saving_replaces_previous_rates() {
        let connection = get_test_connection();
        let mut first = rate_table(&[("USD", 1.0), ("EUR", 0.92), ("GBP", 0.79)]);
        first.last_updated = Some(datetime!(2025-10-18 08:00 UTC));
        let mut second = rate_table(&[("USD", 1.0), ("EUR", 0.95)]);
        second.last_updated = Some(datetime!(2025-10-19 08:00 UTC));

        save_rate_table(&first, &connection).unwrap();
        save_rate_table(&second, &connection).unwrap();
        let got = get_rate_table(&connection).unwrap();

        assert_eq!(got, second);
        assert_eq!(
            get_rates_last_updated(&connection),
            Ok(Some(datetime!(2025-10-19 08:00 UTC)))
        );
    }
}
