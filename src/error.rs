//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a subscription name.
    #[error("Subscription name cannot be empty")]
    EmptySubscriptionName,

    /// The cost entered by the user could not be parsed as a decimal number.
    #[error("\"{0}\" is not a valid cost")]
    InvalidCost(String),

    /// A cost of zero or less was used to create a subscription.
    #[error("Cost must be greater than zero")]
    NonPositiveCost,

    /// A custom colour that is not a six digit hex colour, e.g. "#FF6B6B".
    #[error("\"{0}\" is not a valid hex colour, expected a value like #FF6B6B")]
    InvalidColor(String),

    /// A category code that does not match any known category.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A billing cycle code that is not "monthly" or "yearly".
    #[error("\"{0}\" is not a valid billing cycle")]
    InvalidBillingCycle(String),

    /// A currency code that is not in the supported currency list.
    #[error("the currency \"{0}\" is not supported")]
    UnsupportedCurrency(String),

    /// A month query parameter that is not in the format YYYY-MM.
    #[error("\"{0}\" is not a valid month, expected a value like 2025-01")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a subscription that does not exist
    #[error("tried to update a subscription that is not in the database")]
    UpdateMissingSubscription,

    /// Tried to delete a subscription that does not exist
    #[error("tried to delete a subscription that is not in the database")]
    DeleteMissingSubscription,

    /// The exchange rate API could not be reached or returned an error status.
    #[error("could not fetch exchange rates: {0}")]
    RateFetch(String),

    /// The exchange rate API returned a payload that could not be used.
    #[error("invalid exchange rate response: {0}")]
    InvalidRateResponse(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidMonth(month) => InternalServerError {
                status_code: StatusCode::BAD_REQUEST,
                description: "Invalid Month",
                fix: &format!("\"{month}\" is not a valid month. Use the format YYYY-MM, e.g. 2025-01."),
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UnsupportedCurrency(code) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unsupported currency".to_owned(),
                    details: format!("The currency \"{code}\" is not supported."),
                },
            ),
            Error::UpdateMissingSubscription => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update subscription".to_owned(),
                    details: "The subscription could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingSubscription => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete subscription".to_owned(),
                    details: "The subscription could not be found. \
                    Try refreshing the page to see if the subscription has already been deleted."
                        .to_owned(),
                },
            ),
            Error::RateFetch(reason) | Error::InvalidRateResponse(reason) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not refresh exchange rates".to_owned(),
                    details: format!(
                        "{reason}. The previously saved exchange rates will be used until the next refresh."
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_month_renders_bad_request_page() {
        let response = Error::InvalidMonth("2025-13".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_subscription_alerts_are_not_found() {
        assert_eq!(
            Error::UpdateMissingSubscription
                .into_alert_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DeleteMissingSubscription
                .into_alert_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn rate_errors_alert_as_bad_gateway() {
        let response = Error::RateFetch("timed out".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
