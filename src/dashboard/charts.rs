//! Chart generation and rendering for the dashboard.
//!
//! Charts are built with charming and rendered as JSON configuration for
//! the ECharts library, with a container div and initialization script.

use charming::{
    Chart,
    component::{Legend, Title},
    datatype::DataPointItem,
    element::{ItemStyle, JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::prelude::ToPrimitive;

use crate::{
    currency::CurrencyContext,
    html::{HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, color_swatch},
    summary::CategorySpending,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a dashboard chart.
pub(super) fn chart_container(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[380px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A donut chart of monthly spend per category in the display currency.
pub(super) fn category_chart(spending: &[CategorySpending], currency: &CurrencyContext) -> Chart {
    let data: Vec<DataPointItem> = spending
        .iter()
        .map(|category_spending| {
            let amount = currency
                .to_display(category_spending.monthly)
                .round_dp(2)
                .to_f64()
                .unwrap_or_default();

            DataPointItem::new(amount)
                .name(category_spending.category.label())
                .item_style(ItemStyle::new().color(category_spending.category.color_hex()))
        })
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by category")
                .subtext("Per month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(&currency.display)),
        )
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("Monthly spend")
                .radius(vec!["40%", "70%"])
                .center(vec!["50%", "50%"])
                .item_style(ItemStyle::new().border_color("#fff").border_width(2))
                .data(data),
        )
}

/// Formats chart values with the browser's currency formatter.
fn currency_formatter(currency_code: &str) -> JsFunction {
    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat('en-US', {{
              style: 'currency',
              currency: '{currency_code}'
            }});
            return (number) ? currencyFormatter.format(number) : \"-\";"
        ),
    )
}

/// A table listing each category's monthly spend and share, in the chart's colours.
pub(super) fn category_legend_table(
    spending: &[CategorySpending],
    currency: &CurrencyContext,
) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow-md"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Monthly" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Share" }
                    }
                }

                tbody
                {
                    @for category_spending in spending {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class="flex items-center gap-2"
                                {
                                    (color_swatch(category_spending.category.color_hex()))
                                    (category_spending.category.icon()) " "
                                    (category_spending.category.label())
                                }
                            }

                            td class={ (TABLE_CELL_STYLE) " text-right" }
                            {
                                (currency.format(category_spending.monthly))
                            }

                            td class={ (TABLE_CELL_STYLE) " text-right" }
                            {
                                (category_spending.percent.round_dp(1)) "%"
                            }
                        }
                    }
                }
            }
        }
    }
}
