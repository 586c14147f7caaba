//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    currency::CurrencyContext,
    dashboard::{
        cards::{build_summary_cards, summary_cards_view, upcoming_renewals_view},
        charts::{
            DashboardChart, category_chart, category_legend_table, chart_container, charts_script,
        },
    },
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, HeadElement, base, link},
    navigation::NavBar,
    preferences::get_currency_context,
    subscription::{Subscription, get_all_subscriptions},
    summary::{
        spending_by_category, total_monthly, total_paid_to_date, total_yearly, upcoming_renewals,
    },
    timezone::today,
};

/// How many days ahead the dashboard lists renewals.
const UPCOMING_RENEWALS_DAYS: i64 = 30;

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading subscriptions and settings.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's subscription spending.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscriptions = get_all_subscriptions(&connection)
        .inspect_err(|error| tracing::error!("could not get subscriptions: {error}"))?;

    if subscriptions.is_empty() {
        return Ok(dashboard_no_data_view().into_response());
    }

    let currency = get_currency_context(&connection)
        .inspect_err(|error| tracing::error!("could not load currency settings: {error}"))?;

    Ok(dashboard_view(&subscriptions, &currency, today).into_response())
}

/// Renders the dashboard page when there are no subscriptions.
fn dashboard_no_data_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_subscription_link = link(endpoints::NEW_SUBSCRIPTION_VIEW, "add a subscription");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center gap-4 px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your spending summary will show up here once you "
                (new_subscription_link) ". You can also try the app with some sample data."
            }

            button
                type="button"
                hx-post=(endpoints::SAMPLE_SUBSCRIPTIONS)
                hx-target-error="#alert-container"
                class={ (BUTTON_SECONDARY_STYLE) " max-w-xs" }
            {
                "Load sample subscriptions"
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with totals, the category chart and upcoming renewals.
fn dashboard_view(
    subscriptions: &[Subscription],
    currency: &CurrencyContext,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let renewals = upcoming_renewals(subscriptions, today, UPCOMING_RENEWALS_DAYS);
    let cards = build_summary_cards(
        total_monthly(subscriptions),
        total_yearly(subscriptions),
        total_paid_to_date(subscriptions, today),
        subscriptions.len(),
        renewals.first(),
        currency,
    );

    let spending = spending_by_category(subscriptions);
    let charts = [DashboardChart {
        id: "category-chart",
        options: category_chart(&spending, currency).to_string(),
    }];

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(&cards))

            section
                id="charts"
                class="w-full mx-auto mb-8 grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in &charts {
                    (chart_container(chart))
                }

                (category_legend_table(&spending, currency))
            }

            (upcoming_renewals_view(&renewals, currency, UPCOMING_RENEWALS_DAYS))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
