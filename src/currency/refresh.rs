//! Keeping the cached exchange rates up to date.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use reqwest::Client;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    currency::{
        RateTable, fetch_rates, get_rates_last_updated, rates::rates_are_stale, save_rate_table,
    },
};

/// Fetch the latest rates from `url` and cache them.
///
/// The database lock is only taken after the download has finished. On
/// failure the previously cached rates are left untouched.
///
/// # Errors
/// Returns an error if the rates cannot be fetched or saved.
pub async fn refresh_rates(
    db_connection: &Arc<Mutex<Connection>>,
    client: &Client,
    url: &str,
) -> Result<RateTable, Error> {
    let table = fetch_rates(client, url, OffsetDateTime::now_utc()).await?;

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    save_rate_table(&table, &connection)?;

    Ok(table)
}

/// Refresh the cached rates only if they are missing or older than a day.
///
/// Returns `true` if new rates were fetched.
pub async fn refresh_rates_if_stale(
    db_connection: &Arc<Mutex<Connection>>,
    client: &Client,
    url: &str,
) -> Result<bool, Error> {
    let is_stale = {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        rates_are_stale(get_rates_last_updated(&connection)?, OffsetDateTime::now_utc())
    };

    if !is_stale {
        tracing::debug!("cached exchange rates are fresh, skipping refresh");
        return Ok(false);
    }

    refresh_rates(db_connection, client, url).await?;

    Ok(true)
}

/// Spawn a background task that checks the cached rates every `interval` and
/// refreshes them when they are stale.
///
/// The first check happens immediately.
pub fn spawn_rate_refresh_task(
    db_connection: Arc<Mutex<Connection>>,
    client: Client,
    url: String,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            match refresh_rates_if_stale(&db_connection, &client, &url).await {
                Ok(true) => tracing::info!("exchange rates refreshed"),
                Ok(false) => {}
                Err(error) => tracing::warn!(
                    "could not refresh exchange rates, keeping the cached rates: {error}"
                ),
            }
        }
    })
}

#[cfg(test)]
mod refresh_rates_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use reqwest::Client;
    use rusqlite::Connection;
    use time::OffsetDateTime;
    use tokio::net::TcpListener;

    use crate::currency::{
        create_exchange_rate_tables, get_rate_table, rates::test_utils::rate_table, refresh_rates,
        refresh::refresh_rates_if_stale, save_rate_table,
    };

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{address}/latest")
    }

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().unwrap();
        create_exchange_rate_tables(&connection).unwrap();
        Arc::new(Mutex::new(connection))
    }

    fn rates_router() -> Router {
        Router::new().route(
            "/latest",
            get(|| async {
                r#"{"result":"success","base_code":"USD","rates":{"USD":1.0,"EUR":0.5}}"#
            }),
        )
    }

    #[tokio::test]
    async fn refresh_saves_rates() {
        let db_connection = get_test_connection();
        let url = serve(rates_router()).await;

        refresh_rates(&db_connection, &Client::new(), &url)
            .await
            .unwrap();

        let table = get_rate_table(&db_connection.lock().unwrap()).unwrap();
        assert_eq!(table.rate("EUR"), Some(0.5));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_cached_rates() {
        let db_connection = get_test_connection();
        let cached = rate_table(&[("USD", 1.0), ("EUR", 0.9)]);
        save_rate_table(&cached, &db_connection.lock().unwrap()).unwrap();
        let url = serve(Router::new().route(
            "/latest",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        let result = refresh_rates(&db_connection, &Client::new(), &url).await;

        assert!(result.is_err());
        let table = get_rate_table(&db_connection.lock().unwrap()).unwrap();
        assert_eq!(table, cached);
    }

    #[tokio::test]
    async fn fresh_rates_are_not_refetched() {
        let db_connection = get_test_connection();
        let mut cached = rate_table(&[("USD", 1.0), ("EUR", 0.9)]);
        cached.last_updated = Some(OffsetDateTime::now_utc());
        save_rate_table(&cached, &db_connection.lock().unwrap()).unwrap();
        let url = serve(rates_router()).await;

        let refreshed = refresh_rates_if_stale(&db_connection, &Client::new(), &url)
            .await
            .unwrap();

        assert!(!refreshed);
        let table = get_rate_table(&db_connection.lock().unwrap()).unwrap();
        assert_eq!(table.rate("EUR"), Some(0.9));
    }

    #[tokio::test]
    async fn stale_rates_are_refetched() {
        let db_connection = get_test_connection();
        let cached = rate_table(&[("USD", 1.0), ("EUR", 0.9)]);
        save_rate_table(&cached, &db_connection.lock().unwrap()).unwrap();
        let url = serve(rates_router()).await;

        let refreshed = refresh_rates_if_stale(&db_connection, &Client::new(), &url)
            .await
            .unwrap();

        assert!(refreshed);
        let table = get_rate_table(&db_connection.lock().unwrap()).unwrap();
        assert_eq!(table.rate("EUR"), Some(0.5));
    }

    #[tokio::test]
    async fn day_old_rates_are_refetched() {
        let db_connection = get_test_connection();
        let mut cached = rate_table(&[("USD", 1.0), ("EUR", 0.9)]);
        cached.last_updated = Some(OffsetDateTime::now_utc() - time::Duration::hours(25));
        save_rate_table(&cached, &db_connection.lock().unwrap()).unwrap();
        let url = serve(rates_router()).await;

        let refreshed = refresh_rates_if_stale(&db_connection, &Client::new(), &url)
            .await
            .unwrap();

        assert!(refreshed);
        let table = get_rate_table(&db_connection.lock().unwrap()).unwrap();
        assert_eq!(table.rate("EUR"), Some(0.5));
    }

    #[tokio::test]
    async fn missing_rates_are_fetched() {
        let db_connection = get_test_connection();
        let url = serve(rates_router()).await;

        let refreshed = refresh_rates_if_stale(&db_connection, &Client::new(), &url)
            .await
            .unwrap();

        assert!(refreshed);
        let table = get_rate_table(&db_connection.lock().unwrap()).unwrap();
        assert_eq!(table.rate("EUR"), Some(0.5));
    }
}
