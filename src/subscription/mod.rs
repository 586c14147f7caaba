//! Subscription management: storage, validation and the CRUD pages.

mod catalog;
mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod form;
mod list;
mod sample;

pub use create::{create_subscription_endpoint, get_new_subscription_page};
pub use db::{
    count_subscriptions, create_subscription, create_subscription_table, delete_all_subscriptions,
    delete_subscription, get_all_subscriptions, get_subscription, update_subscription,
};
pub use delete::{delete_all_subscriptions_endpoint, delete_subscription_endpoint};
pub use detail::get_subscription_page;
pub use domain::{
    NewSubscription, Subscription, SubscriptionFormData, SubscriptionId, SubscriptionName,
};
pub use edit::{get_edit_subscription_page, update_subscription_endpoint};
pub use list::get_subscriptions_page;
pub use sample::insert_sample_subscriptions;

#[cfg(test)]
pub(crate) use db::test_utils;
