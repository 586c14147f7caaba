//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    calendar::get_calendar_page,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    settings::{
        get_settings_page, load_sample_subscriptions_endpoint, refresh_rates_endpoint,
        update_display_currency_endpoint,
    },
    subscription::{
        create_subscription_endpoint, delete_all_subscriptions_endpoint,
        delete_subscription_endpoint, get_edit_subscription_page, get_new_subscription_page,
        get_subscription_page, get_subscriptions_page, update_subscription_endpoint,
    },
    summary::get_summary_api,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::SUBSCRIPTIONS_VIEW, get(get_subscriptions_page))
        .route(
            endpoints::NEW_SUBSCRIPTION_VIEW,
            get(get_new_subscription_page),
        )
        .route(endpoints::SUBSCRIPTION_VIEW, get(get_subscription_page))
        .route(
            endpoints::EDIT_SUBSCRIPTION_VIEW,
            get(get_edit_subscription_page),
        )
        .route(endpoints::CALENDAR_VIEW, get(get_calendar_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes are called by HTMX and respond with alerts or the HX-REDIRECT header.
    let api = Router::new()
        .route(
            endpoints::POST_SUBSCRIPTION,
            post(create_subscription_endpoint).delete(delete_all_subscriptions_endpoint),
        )
        .route(
            endpoints::PUT_SUBSCRIPTION,
            put(update_subscription_endpoint).delete(delete_subscription_endpoint),
        )
        .route(
            endpoints::SAMPLE_SUBSCRIPTIONS,
            post(load_sample_subscriptions_endpoint),
        )
        .route(endpoints::SUMMARY_API, get(get_summary_api))
        .route(
            endpoints::DISPLAY_CURRENCY,
            post(update_display_currency_endpoint),
        )
        .route(endpoints::REFRESH_RATES, post(refresh_rates_endpoint));

    pages
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
