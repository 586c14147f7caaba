//! Subscription deletion endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    subscription::{SubscriptionId, delete_all_subscriptions, delete_subscription},
};

/// The state needed for deleting subscriptions.
#[derive(Debug, Clone)]
pub struct DeleteSubscriptionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteSubscriptionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle subscription deletion. Returns success alert or error.
pub async fn delete_subscription_endpoint(
    Path(subscription_id): Path<SubscriptionId>,
    State(state): State<DeleteSubscriptionEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_subscription(subscription_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Subscription deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingSubscription) => {
            Error::DeleteMissingSubscription.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting subscription {subscription_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

/// Delete every subscription. Returns a success alert with the number removed.
pub async fn delete_all_subscriptions_endpoint(
    State(state): State<DeleteSubscriptionEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_all_subscriptions(&connection) {
        Ok(count) => {
            tracing::info!("deleted all {count} subscriptions");

            Alert::Success {
                message: "All subscriptions deleted".to_owned(),
                details: format!("Removed {count} subscription(s)."),
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting all subscriptions: {error}");
            error.into_alert_response()
        }
    }
}
