//! Subscriptions listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    billing::{days_until, monthly_amount, next_renewal_date},
    currency::CurrencyContext,
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, category_badge, color_swatch,
        edit_delete_action_links, format_date, format_days_until,
    },
    navigation::NavBar,
    preferences::get_currency_context,
    subscription::{Subscription, get_all_subscriptions},
    summary::total_monthly,
    timezone::today,
};

/// The max number of graphemes to display in the table rows before
/// truncating and displaying ellipses.
const MAX_NAME_GRAPHEMES: usize = 28;

/// The state needed for the subscriptions listing page.
#[derive(Debug, Clone)]
pub struct SubscriptionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SubscriptionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render all subscriptions, most expensive per month first.
pub async fn get_subscriptions_page(
    State(state): State<SubscriptionsPageState>,
) -> Result<Response, Error> {
    let today = today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut subscriptions = get_all_subscriptions(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve subscriptions: {error}"))?;
    sort_by_monthly_amount(&mut subscriptions);

    let currency = get_currency_context(&connection)
        .inspect_err(|error| tracing::error!("could not load currency settings: {error}"))?;

    Ok(subscriptions_view(&subscriptions, &currency, today).into_response())
}

/// Sort by monthly amount descending, ties keep name order.
fn sort_by_monthly_amount(subscriptions: &mut [Subscription]) {
    subscriptions.sort_by_key(|subscription| std::cmp::Reverse(monthly_amount(subscription)));
}

fn format_name(name: &str) -> (String, Option<&str>) {
    let name_length = name.graphemes(true).count();

    if name_length <= MAX_NAME_GRAPHEMES {
        (name.to_owned(), None)
    } else {
        let truncated: String = name.graphemes(true).take(MAX_NAME_GRAPHEMES - 3).collect();
        (truncated + "...", Some(name))
    }
}

fn subscriptions_view(
    subscriptions: &[Subscription],
    currency: &CurrencyContext,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUBSCRIPTIONS_VIEW).into_html();
    let monthly_total = total_monthly(subscriptions);

    let table_row = |subscription: &Subscription| {
        let detail_url = endpoints::format_endpoint(endpoints::SUBSCRIPTION_VIEW, subscription.id);
        let edit_url =
            endpoints::format_endpoint(endpoints::EDIT_SUBSCRIPTION_VIEW, subscription.id);
        let delete_url =
            endpoints::format_endpoint(endpoints::DELETE_SUBSCRIPTION, subscription.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", subscription.name);
        let (name, full_name) = format_name(subscription.name.as_ref());
        let next_renewal = next_renewal_date(subscription, today);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(detail_url) title=[full_name] class="flex items-center gap-2 font-medium hover:underline"
                    {
                        (color_swatch(subscription.display_color()))
                        (name)
                    }
                }

                td class=(TABLE_CELL_STYLE) { (category_badge(subscription.category)) }

                td class={ (TABLE_CELL_STYLE) " text-right whitespace-nowrap" }
                {
                    (currency.format(subscription.cost))
                    span class="text-gray-500 dark:text-gray-400"
                    {
                        (subscription.billing_cycle.display_suffix())
                    }
                }

                td class={ (TABLE_CELL_STYLE) " text-right whitespace-nowrap" }
                {
                    (currency.format(monthly_amount(subscription)))
                }

                td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" }
                {
                    (format_date(next_renewal))
                    br;
                    span class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (format_days_until(days_until(next_renewal, today)))
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Subscriptions" }

                        @if !subscriptions.is_empty() {
                            span class="text-sm text-gray-600 dark:text-gray-400"
                            {
                                (subscriptions.len()) " active, "
                                (currency.format(monthly_total)) " per month"
                            }
                        }
                    }

                    a href=(endpoints::NEW_SUBSCRIPTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Subscription"
                    }
                }

                @if subscriptions.is_empty() {
                    (empty_subscriptions_view())
                } @else {
                    div class="overflow-x-auto rounded-lg shadow-md"
                    {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Cost" }
                                    th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Monthly" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Next renewal" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for subscription in subscriptions {
                                    (table_row(subscription))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Subscriptions", &[], &content)
}

fn empty_subscriptions_view() -> Markup {
    html! {
        div class="text-center space-y-4 py-8"
        {
            p { "You haven't added any subscriptions yet." }

            p
            {
                a href=(endpoints::NEW_SUBSCRIPTION_VIEW) class=(LINK_STYLE) { "Add your first subscription" }
                " or try the app with some sample data."
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
    }
}
