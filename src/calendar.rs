//! The renewal calendar: a month grid showing which subscriptions charge on each day.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    AppState, Error,
    billing::{last_day_of_month, renewal_dates_between},
    currency::CurrencyContext,
    dashboard::upcoming_renewals_view,
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, color_swatch},
    navigation::NavBar,
    preferences::get_currency_context,
    subscription::{Subscription, get_all_subscriptions},
    summary::upcoming_renewals,
    timezone::today,
};

const UPCOMING_RENEWALS_DAYS: i64 = 30;
const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The state needed for the calendar page.
#[derive(Debug, Clone)]
pub struct CalendarState {
    /// The database connection for reading subscriptions and settings.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CalendarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the calendar page.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// The month to show, formatted as `YYYY-MM`. Defaults to the current month.
    pub month: Option<String>,
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CalendarMonth {
    year: i32,
    month: Month,
}

impl CalendarMonth {
    fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a month formatted as `YYYY-MM`.
    fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self { year, month })
    }

    fn first_day(self) -> Result<Date, Error> {
        Date::from_calendar_date(self.year, self.month, 1)
            .map_err(|_| Error::InvalidMonth(self.query_value()))
    }

    fn last_day(self) -> Result<Date, Error> {
        Date::from_calendar_date(
            self.year,
            self.month,
            last_day_of_month(self.year, self.month),
        )
        .map_err(|_| Error::InvalidMonth(self.query_value()))
    }

    fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    fn next(self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }

    fn query_value(self) -> String {
        format!("{:04}-{:02}", self.year, self.month as u8)
    }

    fn title(self) -> String {
        format!("{} {}", self.month, self.year)
    }

    fn url(self) -> String {
        format!("{}?month={}", endpoints::CALENDAR_VIEW, self.query_value())
    }
}

/// A week of the grid, Monday first. Days outside the month are `None`.
type Week = [Option<Date>; 7];

fn month_weeks(first_day: Date, last_day: Date) -> Vec<Week> {
    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut slot = usize::from(first_day.weekday().number_days_from_monday());
    let mut day = first_day;

    loop {
        week[slot] = Some(day);
        slot += 1;

        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }

        if day >= last_day {
            break;
        }

        match day.next_day() {
            Some(next_day) => day = next_day,
            None => break,
        }
    }

    if slot != 0 {
        weeks.push(week);
    }

    weeks
}

/// Group the charge dates of every subscription in `first_day..=last_day` by day.
fn renewals_by_day(
    subscriptions: &[Subscription],
    first_day: Date,
    last_day: Date,
) -> BTreeMap<Date, Vec<&Subscription>> {
    let mut by_day: BTreeMap<Date, Vec<&Subscription>> = BTreeMap::new();

    for subscription in subscriptions {
        for date in renewal_dates_between(subscription, first_day, last_day) {
            by_day.entry(date).or_default().push(subscription);
        }
    }

    by_day
}

/// Display a month of projected renewals.
pub async fn get_calendar_page(
    State(state): State<CalendarState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let today = today(&state.local_timezone)?;

    let month = match query.month.as_deref() {
        Some(text) if !text.trim().is_empty() => CalendarMonth::parse(text)
            .inspect_err(|error| tracing::debug!("rejected calendar month: {error}"))?,
        _ => CalendarMonth::containing(today),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscriptions = get_all_subscriptions(&connection)
        .inspect_err(|error| tracing::error!("could not get subscriptions: {error}"))?;
    let currency = get_currency_context(&connection)?;

    Ok(calendar_view(month, &subscriptions, &currency, today)?.into_response())
}

fn calendar_view(
    month: CalendarMonth,
    subscriptions: &[Subscription],
    currency: &CurrencyContext,
    today: Date,
) -> Result<Markup, Error> {
    let nav_bar = NavBar::new(endpoints::CALENDAR_VIEW).into_html();
    let first_day = month.first_day()?;
    let last_day = month.last_day()?;
    let by_day = renewals_by_day(subscriptions, first_day, last_day);
    let month_total: Decimal = by_day
        .values()
        .flatten()
        .map(|subscription| subscription.cost)
        .sum();
    let renewals = upcoming_renewals(subscriptions, today, UPCOMING_RENEWALS_DAYS);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-screen-xl mb-8"
            {
                header class="flex items-center justify-between mb-4"
                {
                    a href=(month.previous().url()) class=(LINK_STYLE) id="previous-month"
                    {
                        "← " (month.previous().title())
                    }

                    div class="text-center"
                    {
                        h1 class="text-xl font-bold" { (month.title()) }
                        span class="text-sm text-gray-600 dark:text-gray-400" id="month-total"
                        {
                            (currency.format(month_total)) " due this month"
                        }
                    }

                    a href=(month.next().url()) class=(LINK_STYLE) id="next-month"
                    {
                        (month.next().title()) " →"
                    }
                }

                table class="w-full table-fixed text-sm border-collapse"
                {
                    thead
                    {
                        tr
                        {
                            @for name in WEEKDAY_NAMES {
                                th scope="col" class="py-2 text-gray-600 dark:text-gray-400" { (name) }
                            }
                        }
                    }

                    tbody
                    {
                        @for week in month_weeks(first_day, last_day) {
                            tr
                            {
                                @for day in week {
                                    @match day {
                                        Some(date) => {
                                            (day_cell(date, by_day.get(&date), currency, date == today))
                                        }
                                        None => {
                                            td class="border border-gray-200 dark:border-gray-700" {}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            (upcoming_renewals_view(&renewals, currency, UPCOMING_RENEWALS_DAYS))
        }
    );

    Ok(base("Calendar", &[], &content))
}

fn day_cell(
    date: Date,
    renewals: Option<&Vec<&Subscription>>,
    currency: &CurrencyContext,
    is_today: bool,
) -> Markup {
    let day_style = if is_today {
        "inline-block w-6 h-6 rounded-full bg-blue-600 text-white text-center"
    } else {
        "inline-block w-6 h-6 text-center"
    };

    html! {
        td
            data-date=(date)
            class="h-24 align-top p-1 border border-gray-200 dark:border-gray-700"
        {
            span class=(day_style) { (date.day()) }

            @if let Some(renewals) = renewals {
                ul class="mt-1 space-y-1"
                {
                    @for subscription in renewals {
                        li
                            class={ (CARD_STYLE) " !p-1 flex items-center gap-1 text-xs truncate" }
                            title=(format!("{} {}", subscription.name, currency.format(subscription.cost)))
                        {
                            (color_swatch(subscription.display_color()))
                            span class="truncate" { (subscription.name) }
                        }
                    }
                }
            }
        }
    }
}
