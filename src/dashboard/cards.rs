//! Card components for the dashboard totals and upcoming renewals.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    currency::CurrencyContext,
    endpoints,
    html::{CARD_STYLE, color_swatch, format_date, format_days_until},
    summary::UpcomingRenewal,
};

/// A headline number on the dashboard.
pub(super) struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub caption: String,
}

/// Renders the grid of headline cards.
pub(super) fn summary_cards_view(cards: &[SummaryCard]) -> Markup {
    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-8"
        {
            @for card in cards {
                div class=(CARD_STYLE) aria-label=(format!("{}: {}", card.title, card.value))
                {
                    h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (card.title) }
                    div class="text-2xl font-bold mt-1" { (card.value) }
                    span class="text-xs text-gray-500 dark:text-gray-400" { (card.caption) }
                }
            }
        }
    }
}

/// A list of upcoming renewals, soonest first.
///
/// Shared by the dashboard and the calendar.
pub(crate) fn upcoming_renewals_view(
    renewals: &[UpcomingRenewal<'_>],
    currency: &CurrencyContext,
    window_days: i64,
) -> Markup {
    html! {
        section class={ (CARD_STYLE) " w-full" }
        {
            h3 class="text-lg font-semibold mb-4" { "Upcoming Renewals" }

            @if renewals.is_empty() {
                span class="block text-center py-4 text-gray-600 dark:text-gray-400"
                {
                    "No renewals in the next " (window_days) " days"
                }
            } @else {
                ul class="divide-y divide-gray-100 dark:divide-gray-700"
                {
                    @for renewal in renewals {
                        @let detail_url = endpoints::format_endpoint(
                            endpoints::SUBSCRIPTION_VIEW,
                            renewal.subscription.id,
                        );

                        li class="flex items-center gap-3 py-2"
                        {
                            (color_swatch(renewal.subscription.display_color()))

                            a href=(detail_url) class="flex-1 font-medium hover:underline"
                            {
                                (renewal.subscription.name)
                            }

                            span class="text-sm text-gray-600 dark:text-gray-400"
                            {
                                (format_date(renewal.date)) " · " (format_days_until(renewal.days_until))
                            }

                            span class="font-semibold" { (currency.format(renewal.subscription.cost)) }
                        }
                    }
                }
            }
        }
    }
}

/// Builds the four headline cards.
pub(super) fn build_summary_cards(
    monthly_total: Decimal,
    yearly_total: Decimal,
    paid_total: Decimal,
    subscription_count: usize,
    next_renewal: Option<&UpcomingRenewal<'_>>,
    currency: &CurrencyContext,
) -> [SummaryCard; 4] {
    let next_caption = match next_renewal {
        Some(renewal) => format!(
            "Next: {} {}",
            renewal.subscription.name,
            format_days_until(renewal.days_until).to_lowercase()
        ),
        None => "No renewals in the next 30 days".to_owned(),
    };

    [
        SummaryCard {
            title: "Monthly",
            value: currency.format(monthly_total),
            caption: "Across all subscriptions".to_owned(),
        },
        SummaryCard {
            title: "Yearly",
            value: currency.format(yearly_total),
            caption: "Projected over 12 months".to_owned(),
        },
        SummaryCard {
            title: "Subscriptions",
            value: subscription_count.to_string(),
            caption: next_caption,
        },
        SummaryCard {
            title: "Paid so far",
            value: currency.format_short(paid_total),
            caption: "Since each subscription started".to_owned(),
        },
    ]
}
