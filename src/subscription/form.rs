//! The subscription form shared by the create and edit pages.

use maud::{Markup, html};

use crate::{
    billing::BillingCycle,
    category::Category,
    currency::{BASE_CURRENCY, currency_for},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, cost_input_styles,
    },
    subscription::SubscriptionFormData,
};

/// How the form is submitted.
pub(super) enum FormMethod<'a> {
    Post(&'a str),
    Put(&'a str),
}

/// The extra `<head>` elements the form needs.
pub(super) fn subscription_form_head() -> Vec<HeadElement> {
    currency_for(BASE_CURRENCY)
        .map(cost_input_styles)
        .into_iter()
        .collect()
}

pub(super) fn subscription_form_view(
    method: FormMethod<'_>,
    form: &SubscriptionFormData,
    submit_label: &str,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put) = match method {
        FormMethod::Post(endpoint) => (Some(endpoint), None),
        FormMethod::Put(endpoint) => (None, Some(endpoint)),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Netflix"
                    value=(form.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="cost" class=(FORM_LABEL_STYLE) { "Cost per billing period" }

                div class="input-wrapper"
                {
                    input
                        id="cost"
                        type="text"
                        name="cost"
                        inputmode="decimal"
                        placeholder="0.00"
                        value=(form.cost)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Billing cycle" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for cycle in BillingCycle::ALL {
                        @let id = format!("billing-cycle-{}", cycle.as_str());

                        div class="flex-1"
                        {
                            input
                                id=(id)
                                type="radio"
                                name="billing_cycle"
                                value=(cycle.as_str())
                                checked[form.billing_cycle == cycle]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (cycle.label()) }
                        }
                    }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select id="category" name="category" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in Category::ALL {
                        option value=(category.as_str()) selected[form.category == category]
                        {
                            (category.icon()) " " (category.label())
                        }
                    }
                }
            }

            div
            {
                label for="custom_color" class=(FORM_LABEL_STYLE) { "Colour (optional)" }

                input
                    id="custom_color"
                    type="text"
                    name="custom_color"
                    placeholder="#FF6B6B"
                    value=(form.custom_color)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "First payment" }

                input
                    id="start_date"
                    type="date"
                    name="start_date"
                    value=(form.start_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
