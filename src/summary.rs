//! Spending totals and renewal projections across all subscriptions.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    billing::{days_until, monthly_amount, next_renewal_date, paid_to_date},
    category::Category,
    currency::CurrencyContext,
    preferences::get_currency_context,
    subscription::{Subscription, get_all_subscriptions},
    timezone::today,
};

/// How many days ahead the snapshot looks for renewals.
pub const SNAPSHOT_RENEWAL_WINDOW_DAYS: i64 = 30;
/// The most renewals included in a snapshot.
pub const SNAPSHOT_MAX_RENEWALS: usize = 4;

/// The sum of every subscription's monthly amount.
pub fn total_monthly(subscriptions: &[Subscription]) -> Decimal {
    subscriptions.iter().map(monthly_amount).sum()
}

/// The yearly projection, twelve times [total_monthly].
pub fn total_yearly(subscriptions: &[Subscription]) -> Decimal {
    total_monthly(subscriptions) * Decimal::from(12)
}

/// How much has been charged across all subscriptions as of `as_of`.
pub fn total_paid_to_date(subscriptions: &[Subscription], as_of: Date) -> Decimal {
    subscriptions
        .iter()
        .map(|subscription| paid_to_date(subscription, as_of))
        .sum()
}

/// The monthly spend for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    pub category: Category,
    pub monthly: Decimal,
    /// Share of the total monthly spend, from 0 to 100.
    pub percent: Decimal,
}

/// Monthly spend per category, largest first.
///
/// Categories without subscriptions are left out.
pub fn spending_by_category(subscriptions: &[Subscription]) -> Vec<CategorySpending> {
    let mut per_category: BTreeMap<Category, Decimal> = BTreeMap::new();

    for subscription in subscriptions {
        *per_category.entry(subscription.category).or_default() += monthly_amount(subscription);
    }

    let total: Decimal = per_category.values().sum();

    let mut spending: Vec<CategorySpending> = per_category
        .into_iter()
        .map(|(category, monthly)| CategorySpending {
            category,
            monthly,
            percent: (monthly * Decimal::ONE_HUNDRED)
                .checked_div(total)
                .unwrap_or_default(),
        })
        .collect();

    spending.sort_by(|a, b| b.monthly.cmp(&a.monthly));

    spending
}

/// A subscription and when it next charges.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingRenewal<'a> {
    pub subscription: &'a Subscription,
    pub date: Date,
    pub days_until: i64,
}

/// Subscriptions whose next renewal falls within `days` days of `as_of`, soonest first.
pub fn upcoming_renewals(
    subscriptions: &[Subscription],
    as_of: Date,
    days: i64,
) -> Vec<UpcomingRenewal<'_>> {
    let window_end = as_of + Duration::days(days);

    let mut renewals: Vec<UpcomingRenewal<'_>> = subscriptions
        .iter()
        .map(|subscription| {
            let date = next_renewal_date(subscription, as_of);

            UpcomingRenewal {
                subscription,
                date,
                days_until: days_until(date, as_of),
            }
        })
        .filter(|renewal| renewal.date >= as_of && renewal.date <= window_end)
        .collect();

    renewals.sort_by_key(|renewal| renewal.date);

    renewals
}

/// A renewal in the [SummarySnapshot], with the amount in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRenewal {
    /// The subscription's name.
    pub name: String,
    /// The amount charged, in the display currency.
    pub amount: Decimal,
    /// The next charge date.
    pub renewal_date: Date,
    /// Days from today until `renewal_date`.
    pub days_until: i64,
    /// The subscription's category.
    pub category: Category,
    /// The category's icon tag.
    pub category_icon: &'static str,
    /// The custom colour, or the category colour if none was set.
    pub color: String,
}

/// A compact summary of spending for widgets and other clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySnapshot {
    /// Total monthly spend in the display currency.
    pub total_monthly: Decimal,
    /// Projected yearly spend in the display currency.
    pub total_yearly: Decimal,
    /// The number of subscriptions.
    pub subscription_count: usize,
    /// The next few renewals within the snapshot window, soonest first.
    pub upcoming_renewals: Vec<SnapshotRenewal>,
    /// The display currency code, e.g. "EUR".
    pub currency_code: String,
    /// When the snapshot was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

impl SummarySnapshot {
    /// Summarise `subscriptions` with amounts converted to the display currency.
    pub fn new(
        subscriptions: &[Subscription],
        currency: &CurrencyContext,
        as_of: Date,
        generated_at: OffsetDateTime,
    ) -> Self {
        let in_display_currency = |amount: Decimal| {
            currency
                .to_display(amount)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        };

        let upcoming_renewals =
            upcoming_renewals(subscriptions, as_of, SNAPSHOT_RENEWAL_WINDOW_DAYS)
                .into_iter()
                .take(SNAPSHOT_MAX_RENEWALS)
                .map(|renewal| SnapshotRenewal {
                    name: renewal.subscription.name.to_string(),
                    amount: in_display_currency(renewal.subscription.cost),
                    renewal_date: renewal.date,
                    days_until: renewal.days_until,
                    category: renewal.subscription.category,
                    category_icon: renewal.subscription.category.icon(),
                    color: renewal.subscription.display_color().to_owned(),
                })
                .collect();

        Self {
            total_monthly: in_display_currency(total_monthly(subscriptions)),
            total_yearly: in_display_currency(total_yearly(subscriptions)),
            subscription_count: subscriptions.len(),
            upcoming_renewals,
            currency_code: currency.display.clone(),
            generated_at,
        }
    }
}

/// The state needed for the summary API.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Return the [SummarySnapshot] as JSON.
pub async fn get_summary_api(
    State(state): State<SummaryState>,
) -> Result<Json<SummarySnapshot>, Error> {
    let today = today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscriptions = get_all_subscriptions(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve subscriptions: {error}"))?;
    let currency = get_currency_context(&connection)?;

    Ok(Json(SummarySnapshot::new(
        &subscriptions,
        &currency,
        today,
        OffsetDateTime::now_utc(),
    )))
}


#[cfg(test)]
mod spending_by_category_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        billing::{BillingCycle, test_utils::subscription},
        category::Category,
        summary::spending_by_category,
    };

    #[test]
    fn groups_and_sorts_by_monthly_spend() {
        let mut music =
            subscription(Decimal::from(30), BillingCycle::Monthly, date!(2025 - 01 - 01));
        music.category = Category::Music;
        let streaming_a =
            subscription(Decimal::from(10), BillingCycle::Monthly, date!(2025 - 01 - 01));
        let streaming_b =
            subscription(Decimal::from(120), BillingCycle::Yearly, date!(2025 - 01 - 01));

        let spending = spending_by_category(&[streaming_a, music, streaming_b]);

        assert_eq!(spending.len(), 2);
        assert_eq!(spending[0].category, Category::Music);
        assert_eq!(spending[0].monthly, Decimal::from(30));
        assert_eq!(spending[0].percent, Decimal::from(60));
        assert_eq!(spending[1].category, Category::Streaming);
        assert_eq!(spending[1].monthly, Decimal::from(20));
        assert_eq!(spending[1].percent, Decimal::from(40));
    }

    #[test]
    fn empty_without_subscriptions() {
        assert!(spending_by_category(&[]).is_empty());
    }
}
