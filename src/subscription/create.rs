//! Subscription creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    billing::BillingCycle,
    category::Category,
    currency::{BASE_CURRENCY, format_currency_short},
    endpoints,
    html::{FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, base},
    navigation::NavBar,
    subscription::{
        SubscriptionFormData,
        catalog::{PopularService, PriceTier, featured_services, find_service, services_in},
        create_subscription,
        form::{FormMethod, subscription_form_head, subscription_form_view},
    },
    timezone::today,
};

/// The state needed for the new subscription page.
#[derive(Debug, Clone)]
pub struct NewSubscriptionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewSubscriptionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The state needed for creating a subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSubscriptionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for picking a popular service on the new subscription page.
#[derive(Debug, Default, Deserialize)]
pub struct NewSubscriptionQuery {
    /// The ID of a popular service, e.g. "netflix".
    pub service: Option<String>,
    /// Index into the service's price tiers. Defaults to the service's most common tier.
    pub tier: Option<usize>,
}

/// A popular service and the tier used to fill in the form.
struct ServiceChoice {
    service: &'static PopularService,
    tier_index: usize,
    tier: &'static PriceTier,
}

impl ServiceChoice {
    fn from_query(query: &NewSubscriptionQuery) -> Option<Self> {
        let id = query.service.as_deref()?;

        let Some(service) = find_service(id) else {
            tracing::debug!("ignoring unknown popular service {id:?}");
            return None;
        };

        service
            .tier_or_default(query.tier)
            .map(|(tier_index, tier)| Self {
                service,
                tier_index,
                tier,
            })
    }
}

/// Render the subscription creation page with the first payment defaulting to today.
///
/// If the query names a popular service, the form is filled in from the chosen tier.
pub async fn get_new_subscription_page(
    State(state): State<NewSubscriptionPageState>,
    Query(query): Query<NewSubscriptionQuery>,
) -> Result<Response, Error> {
    let today = today(&state.local_timezone)?;
    let choice = ServiceChoice::from_query(&query);

    Ok(new_subscription_view(today, choice.as_ref()).into_response())
}

/// Handle subscription creation form submission.
pub async fn create_subscription_endpoint(
    State(state): State<CreateSubscriptionEndpointState>,
    Form(form_data): Form<SubscriptionFormData>,
) -> Response {
    let new_subscription = match form_data.validate() {
        Ok(new_subscription) => new_subscription,
        Err(error) => {
            return subscription_form_view(
                FormMethod::Post(endpoints::POST_SUBSCRIPTION),
                &form_data,
                "Add Subscription",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_subscription(new_subscription, &connection) {
        Ok(subscription) => {
            tracing::info!("created subscription {} ({})", subscription.id, subscription.name);

            (
                HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a subscription: {error}");

            error.into_alert_response()
        }
    }
}

fn new_subscription_view(today: Date, choice: Option<&ServiceChoice>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_SUBSCRIPTION_VIEW).into_html();
    let form_data = match choice {
        Some(choice) => SubscriptionFormData {
            name: choice.service.name.to_owned(),
            cost: choice.tier.cost().to_string(),
            billing_cycle: choice.tier.billing_cycle,
            category: choice.service.category,
            custom_color: String::new(),
            start_date: today,
        },
        None => SubscriptionFormData {
            name: String::new(),
            cost: String::new(),
            billing_cycle: BillingCycle::Monthly,
            category: Category::Other,
            custom_color: String::new(),
            start_date: today,
        },
    };
    let form = subscription_form_view(
        FormMethod::Post(endpoints::POST_SUBSCRIPTION),
        &form_data,
        "Add Subscription",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-xl font-bold" { "New Subscription" }
            (popular_services_view(choice))
            (form)
        }
    };

    base("Add Subscription", &subscription_form_head(), &content)
}

const SERVICE_LINK_STYLE: &str = "px-3 py-2 text-sm text-center truncate rounded \
    border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 \
    hover:bg-gray-50 hover:dark:bg-gray-600";
const SELECTED_SERVICE_LINK_STYLE: &str = "px-3 py-2 text-sm text-center truncate rounded \
    border border-blue-600 bg-blue-50 text-blue-700 \
    dark:border-blue-500 dark:bg-blue-600/20 dark:text-blue-200";

fn service_url(service: &PopularService) -> String {
    format!("{}?service={}", endpoints::NEW_SUBSCRIPTION_VIEW, service.id)
}

fn tier_url(service: &PopularService, tier_index: usize) -> String {
    format!("{}&tier={tier_index}", service_url(service))
}

fn service_link(service: &PopularService, choice: Option<&ServiceChoice>) -> Markup {
    let is_selected = choice.is_some_and(|choice| choice.service.id == service.id);
    let style = if is_selected {
        SELECTED_SERVICE_LINK_STYLE
    } else {
        SERVICE_LINK_STYLE
    };

    html! {
        a
            href=(service_url(service))
            data-service=(service.id)
            aria-current=[is_selected.then_some("true")]
            class=(style)
        {
            (service.category.icon()) " " (service.name)
        }
    }
}

fn popular_services_view(choice: Option<&ServiceChoice>) -> Markup {
    html! {
        section id="popular-services" class="w-full mb-6"
        {
            h2 class=(FORM_LABEL_STYLE) { "Popular services" }

            div id="featured-services" class="grid grid-cols-2 gap-2"
            {
                @for service in featured_services() {
                    (service_link(service, choice))
                }
            }

            details id="all-services" class="mt-3"
            {
                summary class="cursor-pointer text-sm" { "All services" }

                @for category in Category::ALL {
                    @let services: Vec<&PopularService> = services_in(category).collect();

                    @if !services.is_empty() {
                        h3 class="mt-3 mb-1 text-xs font-semibold uppercase text-gray-500"
                        {
                            (category.label())
                        }

                        div class="grid grid-cols-2 gap-2"
                        {
                            @for service in services {
                                (service_link(service, choice))
                            }
                        }
                    }
                }
            }

            @if let Some(choice) = choice {
                (price_tiers_view(choice))
            }
        }
    }
}

fn price_tiers_view(choice: &ServiceChoice) -> Markup {
    html! {
        div id="price-tiers" class="mt-4"
        {
            h3 class=(FORM_LABEL_STYLE) { "Choose a " (choice.service.name) " plan" }

            ul class="space-y-2"
            {
                @for (index, tier) in choice.service.tiers.iter().enumerate() {
                    @let is_selected = index == choice.tier_index;
                    @let style = if is_selected {
                        SELECTED_SERVICE_LINK_STYLE
                    } else {
                        SERVICE_LINK_STYLE
                    };

                    li
                    {
                        a
                            href=(tier_url(choice.service, index))
                            data-tier=(index)
                            aria-current=[is_selected.then_some("true")]
                            class={ (style) " flex justify-between" }
                        {
                            span { (tier.name) }
                            span
                            {
                                (format_currency_short(tier.cost(), BASE_CURRENCY))
                                (tier.billing_cycle.display_suffix())
                            }
                        }
                    }
                }
            }
        }
    }
}


#[cfg(test)]
mod create_subscription_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        billing::BillingCycle,
        category::Category,
        endpoints,
        subscription::{
            SubscriptionFormData, create::CreateSubscriptionEndpointState,
            create_subscription_endpoint, create_subscription_table, get_subscription,
        },
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, get_header,
            must_get_form, parse_html_fragment,
        },
    };

    fn get_state() -> CreateSubscriptionEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_subscription_table(&connection).expect("Could not create subscription table");

        CreateSubscriptionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(name: &str, cost: &str) -> SubscriptionFormData {
        SubscriptionFormData {
            name: name.to_owned(),
            cost: cost.to_owned(),
            billing_cycle: BillingCycle::Yearly,
            category: Category::Software,
            custom_color: "#ff6b6b".to_owned(),
            start_date: date!(2025 - 03 - 01),
        }
    }

    #[tokio::test]
    async fn can_create_subscription() {
        let state = get_state();

        let response =
            create_subscription_endpoint(State(state.clone()), Form(form("Figma", "144")))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SUBSCRIPTIONS_VIEW);
        let subscription = get_subscription(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(subscription.name.as_ref(), "Figma");
        assert_eq!(subscription.cost, Decimal::from(144));
        assert_eq!(subscription.billing_cycle, BillingCycle::Yearly);
        assert_eq!(subscription.category, Category::Software);
        assert_eq!(subscription.custom_color.as_deref(), Some("#FF6B6B"));
        assert_eq!(subscription.start_date, date!(2025 - 03 - 01));
    }

    #[tokio::test]
    async fn create_fails_on_empty_name() {
        let state = get_state();

        let response = create_subscription_endpoint(State(state), Form(form(" ", "10")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Subscription name cannot be empty");
    }

    #[tokio::test]
    async fn create_fails_on_zero_cost() {
        let state = get_state();

        let response = create_subscription_endpoint(State(state.clone()), Form(form("Figma", "0")))
            .await
            .into_response();

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Cost must be greater than zero");
        assert!(get_subscription(1, &state.db_connection.lock().unwrap()).is_err());
    }
}
