//! Dashboard module
//!
//! Provides an overview page with spending totals, a category breakdown
//! chart and the renewals coming up in the next month.

mod cards;
mod charts;
mod handlers;

pub(crate) use cards::upcoming_renewals_view;
pub use handlers::get_dashboard_page;
