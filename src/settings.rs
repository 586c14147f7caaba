//! The settings page: display currency, exchange rates and data management.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use reqwest::Client;
use rusqlite::Connection;
use serde::Deserialize;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    alert::Alert,
    currency::{RateTable, SUPPORTED_CURRENCIES, currency_for, get_rate_table, refresh_rates},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    preferences::{get_display_currency, set_display_currency},
    subscription::{count_subscriptions, insert_sample_subscriptions},
    timezone::today,
};

const LAST_UPDATED_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

/// The state needed for the settings page and the endpoints that only touch the database.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The state needed for fetching new exchange rates.
#[derive(Debug, Clone)]
pub struct RefreshRatesState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub http_client: Client,
    /// Where the latest exchange rates are fetched from.
    pub rates_url: String,
}

impl FromRef<AppState> for RefreshRatesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            rates_url: state.rates_url.clone(),
        }
    }
}

/// Form data for changing the display currency.
#[derive(Debug, Deserialize)]
pub struct DisplayCurrencyForm {
    pub currency: String,
}

/// Render the settings page.
pub async fn get_settings_page(State(state): State<SettingsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let display_currency = get_display_currency(&connection)?;
    let rates = get_rate_table(&connection)
        .inspect_err(|error| tracing::error!("could not load exchange rates: {error}"))?;
    let subscription_count = count_subscriptions(&connection)?;

    Ok(settings_view(
        &display_currency,
        &rates,
        subscription_count,
        OffsetDateTime::now_utc(),
    )
    .into_response())
}

/// Save the display currency. Returns a success alert or error.
pub async fn update_display_currency_endpoint(
    State(state): State<SettingsState>,
    Form(form): Form<DisplayCurrencyForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_display_currency(&form.currency, &connection) {
        Ok(()) => {
            let name = currency_for(&form.currency)
                .map(|currency| currency.name)
                .unwrap_or_default();

            Alert::Success {
                message: "Display currency updated".to_owned(),
                details: format!("Amounts are now shown in {name} ({}).", form.currency),
            }
            .into_response()
        }
        Err(Error::UnsupportedCurrency(code)) => {
            tracing::warn!("rejected unsupported display currency {code}");
            Error::UnsupportedCurrency(code).into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while saving the display currency: {error}"
            );
            error.into_alert_response()
        }
    }
}

/// Fetch the latest exchange rates now, regardless of their age.
pub async fn refresh_rates_endpoint(State(state): State<RefreshRatesState>) -> Response {
    match refresh_rates(&state.db_connection, &state.http_client, &state.rates_url).await {
        Ok(table) => Alert::Success {
            message: "Exchange rates updated".to_owned(),
            details: format!("Fetched {} exchange rates.", table.rates.len()),
        }
        .into_response(),
        Err(error) => {
            tracing::warn!("manual exchange rate refresh failed: {error}");
            error.into_alert_response()
        }
    }
}

/// Add the sample subscriptions and redirect to the subscriptions page.
pub async fn load_sample_subscriptions_endpoint(State(state): State<SettingsState>) -> Response {
    let today = match today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match insert_sample_subscriptions(today, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while adding sample subscriptions: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn format_last_updated(rates: &RateTable) -> String {
    match rates.last_updated {
        Some(last_updated) => last_updated
            .format(LAST_UPDATED_FORMAT)
            .unwrap_or_else(|_| last_updated.to_string()),
        None => "Never".to_owned(),
    }
}

fn settings_view(
    display_currency: &str,
    rates: &RateTable,
    subscription_count: u32,
    now: OffsetDateTime,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Settings" }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Display currency" }

                    form
                        hx-post=(endpoints::DISPLAY_CURRENCY)
                        hx-target-error="#alert-container"
                        hx-swap="none"
                        class="space-y-4"
                    {
                        label for="currency" class=(FORM_LABEL_STYLE)
                        {
                            "Show amounts in"
                        }

                        select id="currency" name="currency" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for currency in &SUPPORTED_CURRENCIES {
                                option
                                    value=(currency.code)
                                    selected[currency.code == display_currency]
                                {
                                    (currency.symbol) " " (currency.code) " - " (currency.name)
                                }
                            }
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                    }
                }

                section id="rate-status" class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Exchange rates" }

                    dl class="space-y-2 mb-4"
                    {
                        div class="flex justify-between"
                        {
                            dt { "Currencies" }
                            dd { (rates.rates.len()) }
                        }

                        div class="flex justify-between"
                        {
                            dt { "Last updated" }
                            dd { (format_last_updated(rates)) }
                        }

                        div class="flex justify-between"
                        {
                            dt { "Status" }
                            dd
                            {
                                @if rates.is_empty() {
                                    span class="text-red-600 dark:text-red-400" { "No rates, amounts are shown unconverted" }
                                } @else if rates.is_stale(now) {
                                    span class="text-yellow-600 dark:text-yellow-400" { "Out of date" }
                                } @else {
                                    span class="text-green-600 dark:text-green-400" { "Up to date" }
                                }
                            }
                        }
                    }

                    button
                        id="indicator"
                        type="button"
                        hx-post=(endpoints::REFRESH_RATES)
                        hx-target-error="#alert-container"
                        hx-swap="none"
                        hx-indicator="#indicator"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        span class="htmx-indicator" { (loading_spinner()) }
                        "Refresh now"
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Data" }

                    span class="block mb-4 text-sm text-gray-600 dark:text-gray-400"
                    {
                        (subscription_count) " subscription(s) stored."
                    }

                    button
                        type="button"
                        hx-post=(endpoints::SAMPLE_SUBSCRIPTIONS)
                        hx-target-error="#alert-container"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Load sample subscriptions"
                    }

                    button
                        type="button"
                        hx-delete=(endpoints::DELETE_ALL_SUBSCRIPTIONS)
                        hx-confirm="Are you sure you want to delete every subscription? This cannot be undone."
                        hx-target-error="#alert-container"
                        hx-swap="none"
                        class={ (BUTTON_SECONDARY_STYLE) " text-red-600 dark:text-red-400" }
                    {
                        "Delete all subscriptions"
                    }
                }
            }
        }
    );

    base("Settings", &[], &content)
}


#[cfg(test)]
mod settings_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form, Router,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::get,
    };
    use reqwest::Client;
    use rusqlite::Connection;
    use tokio::net::TcpListener;

    use crate::{
        currency::get_rate_table,
        db::initialize,
        endpoints,
        preferences::get_display_currency,
        settings::{
            DisplayCurrencyForm, RefreshRatesState, SettingsState,
            load_sample_subscriptions_endpoint, refresh_rates_endpoint,
            update_display_currency_endpoint,
        },
        subscription::count_subscriptions,
        test_utils::assert_hx_redirect,
    };

    fn get_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        Arc::new(Mutex::new(connection))
    }

    fn get_state() -> SettingsState {
        SettingsState {
            db_connection: get_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_change_display_currency() {
        let state = get_state();

        let response = update_display_currency_endpoint(
            State(state.clone()),
            Form(DisplayCurrencyForm {
                currency: "EUR".to_owned(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_display_currency(&state.db_connection.lock().unwrap()),
            Ok("EUR".to_owned())
        );
    }

    #[tokio::test]
    async fn rejects_unsupported_currency() {
        let state = get_state();

        let response = update_display_currency_endpoint(
            State(state.clone()),
            Form(DisplayCurrencyForm {
                currency: "ABC".to_owned(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_display_currency(&state.db_connection.lock().unwrap()),
            Ok("USD".to_owned())
        );
    }

    #[tokio::test]
    async fn loads_sample_subscriptions() {
        let state = get_state();

        let response = load_sample_subscriptions_endpoint(State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SUBSCRIPTIONS_VIEW);
        assert_eq!(
            count_subscriptions(&state.db_connection.lock().unwrap()),
            Ok(12)
        );
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{address}/latest")
    }

    #[tokio::test]
    async fn refresh_saves_fetched_rates() {
        let url = serve(Router::new().route(
            "/latest",
            get(|| async {
                r#"{"result":"success","base_code":"USD","rates":{"USD":1.0,"NZD":1.7}}"#
            }),
        ))
        .await;
        let state = RefreshRatesState {
            db_connection: get_connection(),
            http_client: Client::new(),
            rates_url: url,
        };

        let response = refresh_rates_endpoint(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let table = get_rate_table(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(table.rate("NZD"), Some(1.7));
    }

    #[tokio::test]
    async fn refresh_failure_is_bad_gateway() {
        let url = serve(Router::new().route(
            "/latest",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        ))
        .await;
        let state = RefreshRatesState {
            db_connection: get_connection(),
            http_client: Client::new(),
            rates_url: url,
        };

        let response = refresh_rates_endpoint(State(state)).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
