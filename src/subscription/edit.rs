//! Subscription editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    subscription::{
        SubscriptionFormData, SubscriptionId,
        form::{FormMethod, subscription_form_head, subscription_form_view},
        get_subscription, update_subscription,
    },
};

/// The state needed for the edit subscription page and endpoint.
#[derive(Debug, Clone)]
pub struct EditSubscriptionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditSubscriptionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the subscription editing page filled in with the stored values.
pub async fn get_edit_subscription_page(
    Path(subscription_id): Path<SubscriptionId>,
    State(state): State<EditSubscriptionState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscription = get_subscription(subscription_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve subscription {subscription_id}: {error}");
        }
    })?;

    Ok(edit_subscription_view(
        subscription_id,
        subscription.name.as_ref(),
        &SubscriptionFormData::from(&subscription),
    )
    .into_response())
}

/// Handle subscription update form submission.
pub async fn update_subscription_endpoint(
    Path(subscription_id): Path<SubscriptionId>,
    State(state): State<EditSubscriptionState>,
    Form(form_data): Form<SubscriptionFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_SUBSCRIPTION, subscription_id);

    let subscription = match form_data.validate() {
        Ok(subscription) => subscription,
        Err(error) => {
            return subscription_form_view(
                FormMethod::Put(&update_endpoint),
                &form_data,
                "Save Changes",
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

    match update_subscription(subscription_id, subscription, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::SUBSCRIPTION_VIEW,
                subscription_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingSubscription) => {
            Error::UpdateMissingSubscription.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating subscription {subscription_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_subscription_view(
    subscription_id: SubscriptionId,
    name: &str,
    form_data: &SubscriptionFormData,
) -> Markup {
    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_SUBSCRIPTION_VIEW, subscription_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_SUBSCRIPTION, subscription_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = subscription_form_view(
        FormMethod::Put(&update_endpoint),
        form_data,
        "Save Changes",
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-xl font-bold" { "Edit " (name) }
            (form)
        }
    };

    base("Edit Subscription", &subscription_form_head(), &content)
}

#[cfg(test)]
mod edit_subscription_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        billing::BillingCycle,
        category::Category,
        endpoints,
        subscription::{
            SubscriptionFormData, create_subscription, create_subscription_table,
            db::test_utils::new_subscription, edit::EditSubscriptionState,
            get_edit_subscription_page, get_subscription, update_subscription_endpoint,
        },
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, must_get_form, parse_html_document,
            parse_html_fragment,
        },
    };

    fn get_state() -> EditSubscriptionState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_subscription_table(&connection).expect("Could not create subscription table");
        create_subscription(
            new_subscription(
                "Netflix",
                Decimal::new(1599, 2),
                BillingCycle::Monthly,
                date!(2025 - 01 - 15),
            ),
            &connection,
        )
        .expect("Could not create subscription");

        EditSubscriptionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn edit_page_shows_stored_values() {
        let state = get_state();

        let response = get_edit_subscription_page(Path(1), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/subscriptions/1", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Netflix");
        assert_form_input_with_value(&form, "cost", "text", "15.99");
        assert_form_input_with_value(&form, "start_date", "date", "2025-01-15");
    }

    #[tokio::test]
    async fn edit_page_for_missing_subscription_is_not_found() {
        let state = get_state();

        let result = get_edit_subscription_page(Path(99), State(state)).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn can_update_subscription() {
        let state = get_state();
        let form = SubscriptionFormData {
            name: "Netflix Premium".to_owned(),
            cost: "22.99".to_owned(),
            billing_cycle: BillingCycle::Monthly,
            category: Category::Streaming,
            custom_color: String::new(),
            start_date: date!(2025 - 01 - 15),
        };

        let response = update_subscription_endpoint(Path(1), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &endpoints::format_endpoint(endpoints::SUBSCRIPTION_VIEW, 1),
        );
        let subscription = get_subscription(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(subscription.name.as_ref(), "Netflix Premium");
        assert_eq!(subscription.cost, Decimal::new(2299, 2));
    }

    #[tokio::test]
    async fn update_fails_on_invalid_cost() {
        let state = get_state();
        let form = SubscriptionFormData {
            name: "Netflix".to_owned(),
            cost: "lots".to_owned(),
            billing_cycle: BillingCycle::Monthly,
            category: Category::Streaming,
            custom_color: String::new(),
            start_date: date!(2025 - 01 - 15),
        };

        let response = update_subscription_endpoint(Path(1), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: \"lots\" is not a valid cost");
    }

    #[tokio::test]
    async fn update_missing_subscription_returns_not_found() {
        let state = get_state();
        let form = SubscriptionFormData {
            name: "Ghost".to_owned(),
            cost: "1".to_owned(),
            billing_cycle: BillingCycle::Monthly,
            category: Category::Other,
            custom_color: String::new(),
            start_date: date!(2025 - 01 - 15),
        };

        let response = update_subscription_endpoint(Path(42), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
