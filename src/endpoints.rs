//! The page and API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/subscriptions/{subscription_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with spending totals and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing all subscriptions.
pub const SUBSCRIPTIONS_VIEW: &str = "/subscriptions";
/// The page for creating a new subscription.
pub const NEW_SUBSCRIPTION_VIEW: &str = "/subscriptions/new";
/// The page showing a single subscription's billing details.
pub const SUBSCRIPTION_VIEW: &str = "/subscriptions/{subscription_id}";
/// The page for editing an existing subscription.
pub const EDIT_SUBSCRIPTION_VIEW: &str = "/subscriptions/{subscription_id}/edit";
/// The month calendar of renewal dates.
pub const CALENDAR_VIEW: &str = "/calendar";
/// The page for choosing the display currency and managing data.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a subscription.
pub const POST_SUBSCRIPTION: &str = "/api/subscriptions";
/// The route to update a subscription.
pub const PUT_SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}";
/// The route to delete a subscription.
pub const DELETE_SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}";
/// The route to delete every subscription.
pub const DELETE_ALL_SUBSCRIPTIONS: &str = "/api/subscriptions";
/// The route to add the sample subscriptions.
pub const SAMPLE_SUBSCRIPTIONS: &str = "/api/subscriptions/sample";
/// The route for the JSON spending summary.
pub const SUMMARY_API: &str = "/api/summary";
/// The route to change the display currency.
pub const DISPLAY_CURRENCY: &str = "/api/settings/currency";
/// The route to fetch new exchange rates.
pub const REFRESH_RATES: &str = "/api/rates/refresh";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/subscriptions/{subscription_id}',
/// '{subscription_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
