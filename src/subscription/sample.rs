//! Example subscriptions for trying out the app.

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Duration};

use crate::{
    Error,
    billing::BillingCycle::{self, Monthly, Yearly},
    category::Category::{self, Cloud, Fitness, Music, Productivity, Software, Streaming},
    subscription::{NewSubscription, Subscription, SubscriptionName, create_subscription},
};

struct Sample {
    name: &'static str,
    /// Cost in cents.
    cost: i64,
    billing_cycle: BillingCycle,
    category: Category,
    /// How long before "today" the subscription started, spreads renewals over the month.
    days_ago: i64,
}

const fn sample(
    name: &'static str,
    cost: i64,
    billing_cycle: BillingCycle,
    category: Category,
    days_ago: i64,
) -> Sample {
    Sample {
        name,
        cost,
        billing_cycle,
        category,
        days_ago,
    }
}

const SAMPLES: [Sample; 12] = [
    sample("Netflix", 1599, Monthly, Streaming, 95),
    sample("Spotify", 1099, Monthly, Music, 400),
    sample("Adobe Creative Cloud", 5499, Monthly, Software, 47),
    sample("ChatGPT Plus", 2000, Monthly, Productivity, 12),
    sample("YouTube Premium", 1399, Monthly, Streaming, 200),
    sample("Gym Membership", 2999, Monthly, Fitness, 28),
    sample("Figma", 1200, Monthly, Software, 150),
    sample("NordVPN", 9600, Yearly, Software, 340),
    sample("Notion", 800, Monthly, Productivity, 3),
    sample("Disney+", 800, Monthly, Streaming, 66),
    sample("iCloud+", 299, Monthly, Cloud, 730),
    sample("Amazon Prime", 13900, Yearly, Streaming, 20),
];

/// Insert a set of well known subscriptions with start dates before `today`.
///
/// Existing subscriptions are kept. Returns the inserted subscriptions.
pub fn insert_sample_subscriptions(
    today: Date,
    connection: &Connection,
) -> Result<Vec<Subscription>, Error> {
    let transaction = connection.unchecked_transaction()?;

    let inserted = SAMPLES
        .iter()
        .map(|sample| {
            let subscription = NewSubscription {
                name: SubscriptionName::new_unchecked(sample.name),
                cost: Decimal::new(sample.cost, 2),
                billing_cycle: sample.billing_cycle,
                category: sample.category,
                custom_color: None,
                start_date: today - Duration::days(sample.days_ago),
            };

            create_subscription(subscription, &transaction)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    transaction.commit()?;
    tracing::info!("inserted {} sample subscriptions", inserted.len());

    Ok(inserted)
}

#[cfg(test)]
mod sample_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        billing::BillingCycle,
        category::Category,
        subscription::{
            count_subscriptions, create_subscription_table, get_all_subscriptions,
            insert_sample_subscriptions,
        },
    };

    #[test]
    fn inserts_twelve_subscriptions_before_today() {
        let connection = Connection::open_in_memory().unwrap();
        create_subscription_table(&connection).unwrap();
        let today = date!(2025 - 10 - 19);

        let inserted = insert_sample_subscriptions(today, &connection).unwrap();

        assert_eq!(inserted.len(), 12);
        assert_eq!(count_subscriptions(&connection), Ok(12));
        assert!(
            get_all_subscriptions(&connection)
                .unwrap()
                .iter()
                .all(|subscription| subscription.start_date <= today
                    && subscription.cost > Decimal::ZERO)
        );
    }

    #[test]
    fn samples_keep_their_cost_cycle_and_category() {
        let connection = Connection::open_in_memory().unwrap();
        create_subscription_table(&connection).unwrap();
        let today = date!(2025 - 10 - 19);

        let inserted = insert_sample_subscriptions(today, &connection).unwrap();

        let adobe = inserted
            .iter()
            .find(|subscription| subscription.name.as_ref() == "Adobe Creative Cloud")
            .unwrap();
        assert_eq!(adobe.cost, Decimal::new(5499, 2));
        assert_eq!(adobe.billing_cycle, BillingCycle::Monthly);
        assert_eq!(adobe.category, Category::Software);
        assert_eq!(adobe.start_date, date!(2025 - 09 - 02));

        let nord = inserted
            .iter()
            .find(|subscription| subscription.name.as_ref() == "NordVPN")
            .unwrap();
        assert_eq!(nord.cost, Decimal::from(96));
        assert_eq!(nord.billing_cycle, BillingCycle::Yearly);
    }
}
