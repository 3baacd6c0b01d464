//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for financial data:
//! - **Weekly Analysis**: grouped bars of income vs expenses per week
//! - **Monthly Analysis**: income vs expenses trend lines per month
//! - **Yearly Analysis**: grouped bars of income vs expenses per year
//! - **Category Analysis**: grouped bars of income vs expenses per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::{Line, bar},
};
use maud::PreEscaped;

use crate::{
    dashboard::aggregation::{
        Bucketing, aggregate_by_bucket, aggregate_by_category, bucket_labels, get_sorted_buckets,
    },
    html::HeadElement,
    transaction::Transaction,
};

const INCOME_COLOR: &str = "#2ecc71";
const EXPENSE_COLOR: &str = "#e74c3c";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
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
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
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
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Grouped bars of income vs expenses per calendar week.
pub(super) fn weekly_chart(transactions: &[Transaction]) -> Chart {
    bucketed_bar_chart(
        transactions,
        Bucketing::Week,
        "Weekly Income vs Expenses",
        "Grouped by week ending",
    )
}

/// Grouped bars of income vs expenses per calendar year.
pub(super) fn yearly_chart(transactions: &[Transaction]) -> Chart {
    bucketed_bar_chart(
        transactions,
        Bucketing::Year,
        "Yearly Income vs Expenses",
        "Grouped by calendar year",
    )
}

fn bucketed_bar_chart(
    transactions: &[Transaction],
    bucketing: Bucketing,
    title: &str,
    subtitle: &str,
) -> Chart {
    let totals = aggregate_by_bucket(transactions, bucketing);
    let buckets = get_sorted_buckets(&totals);
    let labels = bucket_labels(bucketing, &buckets);
    let income: Vec<f64> = buckets.iter().map(|bucket| totals[bucket].income).collect();
    let expenses: Vec<f64> = buckets
        .iter()
        .map(|bucket| totals[bucket].expense)
        .collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("8%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expenses),
        )
}

/// Income vs expenses trend lines per calendar month.
pub(super) fn monthly_chart(transactions: &[Transaction]) -> Chart {
    let totals = aggregate_by_bucket(transactions, Bucketing::Month);
    let buckets = get_sorted_buckets(&totals);
    let labels = bucket_labels(Bucketing::Month, &buckets);
    let income: Vec<f64> = buckets.iter().map(|bucket| totals[bucket].income).collect();
    let expenses: Vec<f64> = buckets
        .iter()
        .map(|bucket| totals[bucket].expense)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Income vs Expenses Trend")
                .subtext("Grouped by calendar month"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("8%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            Line::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expenses),
        )
}

/// Grouped bars of income vs expenses per category, across all time.
pub(super) fn category_chart(transactions: &[Transaction]) -> Chart {
    let totals = aggregate_by_category(transactions);
    let labels: Vec<String> = totals.iter().map(|(category, _)| category.clone()).collect();
    let income: Vec<f64> = totals.iter().map(|(_, totals)| totals.income).collect();
    let expenses: Vec<f64> = totals.iter().map(|(_, totals)| totals.expense).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Category-wise Income vs Expenses")
                .subtext("All time"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("8%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expenses),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
