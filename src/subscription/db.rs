//! Database operations for subscriptions.
//!
//! Costs are stored as decimal strings so that they round trip exactly.

use std::str::FromStr;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    billing::BillingCycle,
    category::Category,
    subscription::{NewSubscription, Subscription, SubscriptionId, SubscriptionName},
};

const SELECT_COLUMNS: &str = "SELECT id, name, cost, billing_cycle, category, custom_color, \
    start_date, created_at, updated_at FROM subscription";

/// Create a subscription and return it with its generated ID.
pub fn create_subscription(
    subscription: NewSubscription,
    connection: &Connection,
) -> Result<Subscription, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO subscription
            (name, cost, billing_cycle, category, custom_color, start_date, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        (
            subscription.name.as_ref(),
            subscription.cost.to_string(),
            subscription.billing_cycle,
            subscription.category,
            &subscription.custom_color,
            subscription.start_date,
            now,
            now,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Subscription {
        id,
        name: subscription.name,
        cost: subscription.cost,
        billing_cycle: subscription.billing_cycle,
        category: subscription.category,
        custom_color: subscription.custom_color,
        start_date: subscription.start_date,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a single subscription by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no subscription with `id`.
pub fn get_subscription(
    id: SubscriptionId,
    connection: &Connection,
) -> Result<Subscription, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id;"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all subscriptions ordered by name.
pub fn get_all_subscriptions(connection: &Connection) -> Result<Vec<Subscription>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY name COLLATE NOCASE ASC, id ASC;"))?
        .query_map([], map_row)?
        .map(|maybe_subscription| maybe_subscription.map_err(|error| error.into()))
        .collect()
}

/// Count the stored subscriptions.
pub fn count_subscriptions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM subscription;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Replace the fields of the subscription `id` with `subscription`.
///
/// The creation time is kept and the update time is set to now.
///
/// # Errors
/// Returns [Error::UpdateMissingSubscription] if the subscription doesn't exist.
pub fn update_subscription(
    id: SubscriptionId,
    subscription: NewSubscription,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE subscription
        SET name = ?1, cost = ?2, billing_cycle = ?3, category = ?4, custom_color = ?5,
            start_date = ?6, updated_at = ?7
        WHERE id = ?8",
        (
            subscription.name.as_ref(),
            subscription.cost.to_string(),
            subscription.billing_cycle,
            subscription.category,
            &subscription.custom_color,
            subscription.start_date,
            OffsetDateTime::now_utc(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingSubscription);
    }

    Ok(())
}

/// Delete a subscription by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingSubscription] if the subscription doesn't exist.
pub fn delete_subscription(id: SubscriptionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM subscription WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingSubscription);
    }

    Ok(())
}

/// Delete every subscription, returning how many were deleted.
pub fn delete_all_subscriptions(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM subscription", [])
        .map_err(Error::from)
}

/// Initialize the subscription table and indexes.
pub fn create_subscription_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS subscription (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            cost TEXT NOT NULL,
            billing_cycle TEXT NOT NULL,
            category TEXT NOT NULL,
            custom_color TEXT,
            start_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_subscription_start_date ON subscription(start_date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Subscription, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let raw_cost: String = row.get(2)?;
    let cost = Decimal::from_str(&raw_cost).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error))
    })?;

    Ok(Subscription {
        id: row.get(0)?,
        name: SubscriptionName::new_unchecked(&raw_name),
        cost,
        billing_cycle: row.get(3)?,
        category: row.get(4)?,
        custom_color: row.get(5)?,
        start_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for BillingCycle {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BillingCycle {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use rust_decimal::Decimal;
    use time::Date;

    use crate::{
        billing::BillingCycle,
        category::Category,
        subscription::{NewSubscription, SubscriptionName},
    };

    pub(crate) fn new_subscription(
        name: &str,
        cost: Decimal,
        billing_cycle: BillingCycle,
        start_date: Date,
    ) -> NewSubscription {
        NewSubscription {
            name: SubscriptionName::new_unchecked(name),
            cost,
            billing_cycle,
            category: Category::Streaming,
            custom_color: None,
            start_date,
        }
    }
}
