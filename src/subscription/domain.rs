//! Core subscription domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, billing::BillingCycle, category::Category};

/// A validated, non-empty subscription name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct SubscriptionName(String);

impl SubscriptionName {
    /// Create a subscription name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptySubscriptionName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptySubscriptionName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a subscription name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for SubscriptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SubscriptionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubscriptionName::new(s)
    }
}

impl Display for SubscriptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a subscription.
pub type SubscriptionId = i64;

/// A recurring payment for a service, e.g. a streaming service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    /// The ID of the subscription.
    pub id: SubscriptionId,
    /// The name of the service, e.g. "Netflix".
    pub name: SubscriptionName,
    /// The amount charged each billing period, in the base currency.
    pub cost: Decimal,
    /// How often the subscription charges.
    pub billing_cycle: BillingCycle,
    /// The kind of service, used to group spending.
    pub category: Category,
    /// A hex colour, e.g. "#FF6B6B", that overrides the category colour.
    pub custom_color: Option<String>,
    /// The date of the first charge.
    pub start_date: Date,
    /// When the subscription was added.
    pub created_at: OffsetDateTime,
    /// When the subscription was last edited.
    pub updated_at: OffsetDateTime,
}

impl Subscription {
    /// The colour to show the subscription with.
    pub fn display_color(&self) -> &str {
        self.custom_color
            .as_deref()
            .unwrap_or(self.category.color_hex())
    }
}

/// The validated fields needed to create or update a subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub name: SubscriptionName,
    pub cost: Decimal,
    pub billing_cycle: BillingCycle,
    pub category: Category,
    pub custom_color: Option<String>,
    pub start_date: Date,
}

/// Form data for subscription creation and editing.
///
/// The cost and colour are kept as text so that invalid input can be shown
/// back to the user with an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionFormData {
    pub name: String,
    pub cost: String,
    pub billing_cycle: BillingCycle,
    pub category: Category,
    #[serde(default)]
    pub custom_color: String,
    pub start_date: Date,
}

impl SubscriptionFormData {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the cost is not a positive
    /// number or the custom colour is not a hex colour.
    pub fn validate(&self) -> Result<NewSubscription, Error> {
        Ok(NewSubscription {
            name: SubscriptionName::new(&self.name)?,
            cost: parse_cost(&self.cost)?,
            billing_cycle: self.billing_cycle,
            category: self.category,
            custom_color: parse_hex_color(&self.custom_color)?,
            start_date: self.start_date,
        })
    }
}

impl From<&Subscription> for SubscriptionFormData {
    fn from(subscription: &Subscription) -> Self {
        Self {
            name: subscription.name.to_string(),
            cost: subscription.cost.to_string(),
            billing_cycle: subscription.billing_cycle,
            category: subscription.category,
            custom_color: subscription.custom_color.clone().unwrap_or_default(),
            start_date: subscription.start_date,
        }
    }
}

/// Parse a user entered cost such as "15.99" or "$1,200".
///
/// # Errors
///
/// Returns [Error::InvalidCost] if `text` is not a number and
/// [Error::NonPositiveCost] if it is zero or negative.
pub fn parse_cost(text: &str) -> Result<Decimal, Error> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let cost =
        Decimal::from_str(&cleaned).map_err(|_| Error::InvalidCost(text.trim().to_owned()))?;

    if cost <= Decimal::ZERO {
        return Err(Error::NonPositiveCost);
    }

    Ok(cost.normalize())
}

/// Parse an optional hex colour, with or without the leading '#'.
///
/// An empty string means no colour. Valid colours are returned in the form
/// "#RRGGBB".
///
/// # Errors
///
/// Returns [Error::InvalidColor] if `text` is not a six digit hex colour.
pub fn parse_hex_color(text: &str) -> Result<Option<String>, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Ok(None);
    }

    let digits = text.strip_prefix('#').unwrap_or(text);

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(text.to_owned()));
    }

    Ok(Some(format!("#{}", digits.to_ascii_uppercase())))
}


#[cfg(test)]
mod parse_tests {
    use rust_decimal::Decimal;

    use crate::{
        Error,
        subscription::domain::{parse_cost, parse_hex_color},
    };

    #[test]
    fn parses_plain_cost() {
        assert_eq!(parse_cost("15.99"), Ok(Decimal::new(1599, 2)));
    }

    #[test]
    fn parses_cost_with_symbol_and_separators() {
        assert_eq!(parse_cost(" $1,200.50 "), Ok(Decimal::new(120050, 2)));
    }

    #[test]
    fn rejects_non_numeric_cost() {
        assert_eq!(parse_cost("abc"), Err(Error::InvalidCost("abc".to_owned())));
    }

    #[test]
    fn rejects_zero_and_negative_cost() {
        assert_eq!(parse_cost("0"), Err(Error::NonPositiveCost));
        assert_eq!(parse_cost("0.00"), Err(Error::NonPositiveCost));
        assert_eq!(parse_cost("-5"), Err(Error::NonPositiveCost));
    }

    #[test]
    fn empty_color_is_none() {
        assert_eq!(parse_hex_color("  "), Ok(None));
    }

    #[test]
    fn color_is_normalised() {
        assert_eq!(parse_hex_color("ff6b6b"), Ok(Some("#FF6B6B".to_owned())));
        assert_eq!(parse_hex_color("#4ecdc4"), Ok(Some("#4ECDC4".to_owned())));
    }

    #[test]
    fn rejects_invalid_color() {
        assert_eq!(
            parse_hex_color("#FFF"),
            Err(Error::InvalidColor("#FFF".to_owned()))
        );
        assert_eq!(
            parse_hex_color("red"),
            Err(Error::InvalidColor("red".to_owned()))
        );
    }
}
