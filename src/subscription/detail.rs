//! The page for a single subscription's billing details.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Duration};

use crate::{
    AppState, Error,
    billing::{
        days_until, monthly_amount, next_renewal_date, paid_to_date, renewal_dates_between,
        yearly_amount,
    },
    currency::CurrencyContext,
    endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, category_badge, color_swatch,
        edit_delete_action_links, format_date, format_days_until,
    },
    navigation::NavBar,
    preferences::get_currency_context,
    subscription::{Subscription, SubscriptionId, get_subscription},
    timezone::today,
};

/// How far ahead to list renewal dates.
const UPCOMING_RENEWALS_WINDOW: Duration = Duration::days(365);
const MAX_UPCOMING_RENEWALS: usize = 6;

/// The state needed for the subscription detail page.
#[derive(Debug, Clone)]
pub struct SubscriptionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SubscriptionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the billing details for a subscription.
pub async fn get_subscription_page(
    Path(subscription_id): Path<SubscriptionId>,
    State(state): State<SubscriptionPageState>,
) -> Result<Response, Error> {
    let today = today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscription = get_subscription(subscription_id, &connection)?;
    let currency = get_currency_context(&connection)
        .inspect_err(|error| tracing::error!("could not load currency settings: {error}"))?;

    Ok(subscription_view(&subscription, &currency, today).into_response())
}

fn subscription_view(
    subscription: &Subscription,
    currency: &CurrencyContext,
    today: Date,
) -> Markup {
    let page_url = endpoints::format_endpoint(endpoints::SUBSCRIPTION_VIEW, subscription.id);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_SUBSCRIPTION_VIEW, subscription.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_SUBSCRIPTION, subscription.id);
    let confirm_message = format!("Are you sure you want to delete '{}'?", subscription.name);
    let nav_bar = NavBar::new(&page_url).into_html();

    let next_renewal = next_renewal_date(subscription, today);
    let upcoming: Vec<Date> =
        renewal_dates_between(subscription, today, today + UPCOMING_RENEWALS_WINDOW)
            .into_iter()
            .take(MAX_UPCOMING_RENEWALS)
            .collect();

    let stat = |label: &str, value: String| {
        html! {
            div class="flex justify-between gap-4 py-2 border-b border-gray-100 dark:border-gray-700"
            {
                dt class="text-gray-600 dark:text-gray-400" { (label) }
                dd class="font-semibold text-right" { (value) }
            }
        }
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            article id="subscription-detail" class={ (CARD_STYLE) " w-full max-w-xl space-y-4" }
            {
                header class="flex justify-between items-start gap-4"
                {
                    div class="space-y-1"
                    {
                        h1 class="text-2xl font-bold flex items-center gap-2"
                        {
                            (color_swatch(subscription.display_color()))
                            (subscription.name)
                        }

                        (category_badge(subscription.category))
                    }

                    div class="text-right"
                    {
                        div class="text-2xl font-bold"
                        {
                            (currency.format(subscription.cost))
                        }

                        span class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (subscription.billing_cycle.display_suffix())
                        }
                    }
                }

                dl
                {
                    (stat("Monthly", currency.format(monthly_amount(subscription))))
                    (stat("Yearly", currency.format(yearly_amount(subscription))))
                    (stat("Started", format_date(subscription.start_date)))
                    (stat(
                        "Next renewal",
                        format!(
                            "{} ({})",
                            format_date(next_renewal),
                            format_days_until(days_until(next_renewal, today))
                        ),
                    ))
                    (stat("Paid to date", currency.format(paid_to_date(subscription, today))))
                }

                section
                {
                    h2 class="text-lg font-semibold mb-2" { "Upcoming renewals" }

                    @if upcoming.is_empty() {
                        span class="text-gray-600 dark:text-gray-400" { "No renewals in the next year." }
                    } @else {
                        ul class="space-y-1"
                        {
                            @for date in &upcoming {
                                li class="flex justify-between"
                                {
                                    span { (format_date(*date)) }
                                    span class="text-gray-600 dark:text-gray-400"
                                    {
                                        (format_days_until(days_until(*date, today)))
                                    }
                                }
                            }
                        }
                    }
                }

                footer class="flex gap-4 items-center"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "#subscription-detail",
                    ))

                    a href=(endpoints::SUBSCRIPTIONS_VIEW) class={ (LINK_STYLE) " ms-auto" }
                    {
                        "All subscriptions"
                    }
                }
            }
        }
    );

    base(subscription.name.as_ref(), &[], &content)
}
