//! Billing calculations for recurring subscriptions.
//!
//! Every function here is pure: the current date is always passed in as
//! `as_of` so that results are deterministic and easy to test.
//!
//! Billing dates are anchored to the subscription's start date. Advancing by
//! `n` periods is always computed from the start date rather than from the
//! previous renewal, and the day of month is clamped to the last valid day of
//! the target month. For example, a monthly subscription that started on
//! 31 January renews on 28 February (29 in a leap year) and then on 31 March.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{Error, subscription::Subscription};

const MONTHS_PER_YEAR: u32 = 12;

/// How often a subscription charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingCycle {
    /// Charges once per calendar month.
    Monthly,
    /// Charges once per calendar year.
    Yearly,
}

impl BillingCycle {
    /// All billing cycles in display order.
    pub const ALL: [BillingCycle; 2] = [BillingCycle::Monthly, BillingCycle::Yearly];

    /// The value used in forms and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// The human readable name, e.g. "Monthly".
    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// The suffix shown after a cost, e.g. "/mo".
    pub fn display_suffix(self) -> &'static str {
        match self {
            Self::Monthly => "/mo",
            Self::Yearly => "/yr",
        }
    }

    fn months_per_period(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Yearly => MONTHS_PER_YEAR,
        }
    }
}

impl Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BillingCycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(Error::InvalidBillingCycle(other.to_owned())),
        }
    }
}

/// The cost of `subscription` normalised to a single month.
///
/// Yearly costs are divided by twelve using decimal arithmetic so that sums
/// over many subscriptions do not drift.
pub fn monthly_amount(subscription: &Subscription) -> Decimal {
    match subscription.billing_cycle {
        BillingCycle::Monthly => subscription.cost,
        BillingCycle::Yearly => subscription.cost / Decimal::from(MONTHS_PER_YEAR),
    }
}

/// The projected cost of `subscription` over a year.
///
/// Always twelve times [monthly_amount] so the monthly and yearly views agree.
pub fn yearly_amount(subscription: &Subscription) -> Decimal {
    monthly_amount(subscription) * Decimal::from(MONTHS_PER_YEAR)
}

/// Advance `start` by `periods` billing periods of `cycle`.
///
/// The day of month is clamped to the last day of the target month.
/// Returns `start` unchanged in the (practically unreachable) case where the
/// result would fall outside the range supported by [Date].
pub fn add_billing_periods(start: Date, cycle: BillingCycle, periods: u32) -> Date {
    let months = periods.saturating_mul(cycle.months_per_period());
    add_months_clamped(start, months).unwrap_or(start)
}

/// The number of whole billing periods between `start` and `as_of`.
///
/// This is the largest `n` such that `start` advanced by `n` periods is on or
/// before `as_of`. Returns zero when `start` is after `as_of`.
pub fn elapsed_billing_periods(start: Date, cycle: BillingCycle, as_of: Date) -> u32 {
    if start > as_of {
        return 0;
    }

    let months_between = (as_of.year() - start.year()) * MONTHS_PER_YEAR as i32
        + (as_of.month() as i32 - start.month() as i32);
    let mut periods = (months_between.max(0) as u32) / cycle.months_per_period();

    // The calendar month difference can overshoot by one period when the
    // anniversary day has not been reached yet.
    while periods > 0 && add_billing_periods(start, cycle, periods) > as_of {
        periods -= 1;
    }

    periods
}

/// The next date on which `subscription` charges, as seen on `as_of`.
///
/// A subscription that has not started yet renews on its start date.
/// Otherwise the charge for the current period is considered paid (see
/// [paid_to_date]) and the next renewal is the start of the following period,
/// so the result is always on or after both `as_of` and the start date.
pub fn next_renewal_date(subscription: &Subscription, as_of: Date) -> Date {
    if subscription.start_date > as_of {
        return subscription.start_date;
    }

    let elapsed =
        elapsed_billing_periods(subscription.start_date, subscription.billing_cycle, as_of);

    add_billing_periods(
        subscription.start_date,
        subscription.billing_cycle,
        elapsed + 1,
    )
}

/// The total amount charged for `subscription` up to and including `as_of`.
///
/// The first payment is due on the start date, so a subscription that started
/// on or before `as_of` has always paid for at least one period. Partial
/// periods are not prorated.
pub fn paid_to_date(subscription: &Subscription, as_of: Date) -> Decimal {
    if subscription.start_date > as_of {
        return Decimal::ZERO;
    }

    let periods_paid =
        elapsed_billing_periods(subscription.start_date, subscription.billing_cycle, as_of) + 1;

    subscription.cost * Decimal::from(periods_paid)
}

/// Every date in `from..=to` on which `subscription` charges.
///
/// The start date counts as a charge date.
pub fn renewal_dates_between(subscription: &Subscription, from: Date, to: Date) -> Vec<Date> {
    let start = subscription.start_date;
    let cycle = subscription.billing_cycle;

    if from > to || start > to {
        return Vec::new();
    }

    let mut period = if start >= from {
        0
    } else {
        // Skip straight to the last charge before `from`.
        elapsed_billing_periods(start, cycle, from)
    };

    let mut dates = Vec::new();

    loop {
        let date = add_billing_periods(start, cycle, period);

        if date > to {
            break;
        }

        if date >= from {
            dates.push(date);
        }

        period += 1;
    }

    dates
}

/// The number of whole days from `as_of` until `date`.
///
/// Negative if `date` is before `as_of`.
pub fn days_until(date: Date, as_of: Date) -> i64 {
    (date - as_of).whole_days()
}

fn add_months_clamped(date: Date, months: u32) -> Option<Date> {
    let month_index = date.month() as i64 - 1 + i64::from(months);
    let year = i64::from(date.year()) + month_index.div_euclid(12);
    let year = i32::try_from(year).ok()?;
    let month = Month::try_from((month_index.rem_euclid(12) + 1) as u8).ok()?;
    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).ok()
}

/// The number of days in `month` of `year`.
pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}


#[cfg(test)]
mod amount_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::billing::{BillingCycle, monthly_amount, test_utils::subscription, yearly_amount};

    #[test]
    fn monthly_cycle_returns_cost() {
        let sub = subscription(Decimal::new(1599, 2), BillingCycle::Monthly, date!(2025 - 01 - 15));

        assert_eq!(monthly_amount(&sub), Decimal::new(1599, 2));
    }

    #[test]
    fn yearly_cycle_divides_by_twelve() {
        let sub = subscription(Decimal::from(120), BillingCycle::Yearly, date!(2025 - 01 - 15));

        assert_eq!(monthly_amount(&sub), Decimal::from(10));
    }

    #[test]
    fn yearly_cycle_is_within_a_cent_of_a_twelfth() {
        let sub = subscription(Decimal::new(13900, 2), BillingCycle::Yearly, date!(2025 - 01 - 15));

        let got = monthly_amount(&sub).round_dp(2);

        assert_eq!(got, Decimal::new(1158, 2));
    }

    #[test]
    fn yearly_amount_is_twelve_times_monthly_amount() {
        for (cost, cycle) in [
            (Decimal::new(1599, 2), BillingCycle::Monthly),
            (Decimal::new(9600, 2), BillingCycle::Yearly),
            (Decimal::from(100), BillingCycle::Yearly),
            (Decimal::new(1, 2), BillingCycle::Monthly),
        ] {
            let sub = subscription(cost, cycle, date!(2025 - 01 - 15));

            assert_eq!(yearly_amount(&sub), monthly_amount(&sub) * Decimal::from(12));
        }
    }

    #[test]
    fn sum_of_many_yearly_amounts_does_not_drift() {
        let sub = subscription(Decimal::new(9999, 2), BillingCycle::Yearly, date!(2025 - 01 - 15));

        let total: Decimal = (0..1000).map(|_| monthly_amount(&sub)).sum();

        // 1000 * 99.99 / 12 = 8332.5
        assert_eq!(total.round_dp(2), Decimal::new(833250, 2));
    }
}

#[cfg(test)]
mod add_billing_periods_tests {
    use time::macros::date;

    use crate::billing::{BillingCycle, add_billing_periods};

    #[test]
    fn zero_periods_returns_start() {
        let start = date!(2024 - 01 - 31);

        assert_eq!(add_billing_periods(start, BillingCycle::Monthly, 0), start);
        assert_eq!(add_billing_periods(start, BillingCycle::Yearly, 0), start);
    }

    #[test]
    fn month_end_clamps_in_leap_year() {
        let got = add_billing_periods(date!(2024 - 01 - 31), BillingCycle::Monthly, 1);

        assert_eq!(got, date!(2024 - 02 - 29));
    }

    #[test]
    fn month_end_clamps_in_common_year() {
        let got = add_billing_periods(date!(2025 - 01 - 31), BillingCycle::Monthly, 1);

        assert_eq!(got, date!(2025 - 02 - 28));
    }

    #[test]
    fn clamping_does_not_carry_over_to_later_periods() {
        let got = add_billing_periods(date!(2025 - 01 - 31), BillingCycle::Monthly, 2);

        assert_eq!(got, date!(2025 - 03 - 31));
    }

    #[test]
    fn clamps_to_thirty_day_month() {
        let got = add_billing_periods(date!(2025 - 03 - 31), BillingCycle::Monthly, 1);

        assert_eq!(got, date!(2025 - 04 - 30));
    }

    #[test]
    fn crosses_year_boundary() {
        let got = add_billing_periods(date!(2024 - 11 - 15), BillingCycle::Monthly, 3);

        assert_eq!(got, date!(2025 - 02 - 15));
    }

    #[test]
    fn leap_day_clamps_in_following_year() {
        let got = add_billing_periods(date!(2024 - 02 - 29), BillingCycle::Yearly, 1);

        assert_eq!(got, date!(2025 - 02 - 28));
    }

    #[test]
    fn leap_day_returns_in_next_leap_year() {
        let got = add_billing_periods(date!(2024 - 02 - 29), BillingCycle::Yearly, 4);

        assert_eq!(got, date!(2028 - 02 - 29));
    }
}



#[cfg(test)]
mod paid_to_date_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::billing::{BillingCycle, paid_to_date, test_utils::subscription};

    #[test]
    fn future_start_has_paid_nothing() {
        let sub = subscription(
            Decimal::new(1599, 2),
            BillingCycle::Monthly,
            date!(2025 - 11 - 01),
        );

        assert_eq!(paid_to_date(&sub, date!(2025 - 10 - 19)), Decimal::ZERO);
    }

    #[test]
    fn first_payment_is_due_at_signup() {
        let sub = subscription(
            Decimal::new(1599, 2),
            BillingCycle::Monthly,
            date!(2025 - 10 - 19),
        );

        assert_eq!(
            paid_to_date(&sub, date!(2025 - 10 - 19)),
            Decimal::new(1599, 2)
        );
    }

    #[test]
    fn two_months_ago_counts_three_periods() {
        let sub = subscription(
            Decimal::new(1599, 2),
            BillingCycle::Monthly,
            date!(2025 - 08 - 19),
        );

        assert_eq!(
            paid_to_date(&sub, date!(2025 - 10 - 19)),
            Decimal::new(1599, 2) * Decimal::from(3)
        );
    }

    #[test]
    fn mid_period_is_not_prorated() {
        let sub = subscription(
            Decimal::new(1599, 2),
            BillingCycle::Monthly,
            date!(2025 - 08 - 19),
        );

        assert_eq!(
            paid_to_date(&sub, date!(2025 - 10 - 18)),
            Decimal::new(1599, 2) * Decimal::from(2)
        );
    }

    #[test]
    fn yearly_counts_started_years() {
        let sub = subscription(
            Decimal::from(96),
            BillingCycle::Yearly,
            date!(2024 - 09 - 19),
        );

        assert_eq!(paid_to_date(&sub, date!(2025 - 10 - 19)), Decimal::from(192));
        assert_eq!(paid_to_date(&sub, date!(2025 - 09 - 18)), Decimal::from(96));
    }
}
