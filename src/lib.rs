//! Subscribeur is a web app for keeping track of recurring subscriptions.
//!
//! It projects renewal dates, normalises costs to monthly and yearly amounts,
//! totals what has been paid so far and converts everything into the user's
//! chosen display currency.
//!
//! This library provides a REST API that directly serves HTML pages, plus a
//! JSON summary endpoint for widgets.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod billing;
mod calendar;
mod category;
mod currency;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod preferences;
mod routing;
mod settings;
mod subscription;
mod summary;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use billing::{
    BillingCycle, add_billing_periods, days_until, elapsed_billing_periods, monthly_amount,
    next_renewal_date, paid_to_date, renewal_dates_between, yearly_amount,
};
pub use category::Category;
pub use currency::{
    CurrencyContext, DEFAULT_RATES_URL, RateTable, convert, format_currency,
    format_currency_short, spawn_rate_refresh_task,
};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use subscription::{Subscription, insert_sample_subscriptions};
pub use summary::SummarySnapshot;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
