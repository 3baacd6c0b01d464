//! The metric cards at the top of the dashboard.
//!
//! Shows the current month's income, expenses and balance, with the
//! month-over-month change for income and expenses.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::MonthlyMetrics,
    html::{CARD_STYLE, format_currency},
};

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// A trend line under a metric, colored by whether the change is an increase
/// or a decrease.
fn trend_indicator(change: f64) -> Markup {
    let (style, arrow) = if change >= 0.0 {
        ("text-green-600 dark:text-green-400", "▲")
    } else {
        ("text-red-600 dark:text-red-400", "▼")
    };

    html!(
        div class={"text-sm " (style)}
        {
            (arrow) " " (format_percentage(change)) "% vs last month"
        }
    )
}

/// Renders the three metric cards for the current month.
pub(super) fn metric_cards(metrics: &MonthlyMetrics) -> Markup {
    let balance_style = if metrics.balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html!(
        section class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full mb-6"
        {
            div class=(CARD_STYLE)
            {
                h4 class="text-sm text-gray-600 dark:text-gray-400 mb-1" { "Income" }
                div class="text-3xl font-bold mb-1" { (format_currency(metrics.income)) }
                (trend_indicator(metrics.income_change))
            }

            div class=(CARD_STYLE)
            {
                h4 class="text-sm text-gray-600 dark:text-gray-400 mb-1" { "Expenses" }
                div class="text-3xl font-bold mb-1" { (format_currency(metrics.expenses)) }
                (trend_indicator(metrics.expenses_change))
            }

            div class=(CARD_STYLE)
            {
                h4 class="text-sm text-gray-600 dark:text-gray-400 mb-1" { "Balance" }
                div class={"text-3xl font-bold mb-1 " (balance_style)}
                {
                    (format_currency(metrics.balance))
                }
                div class="text-sm text-gray-600 dark:text-gray-400" { "This month" }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use crate::dashboard::aggregation::MonthlyMetrics;

    use super::{format_percentage, metric_cards};

    #[test]
    fn format_percentage_avoids_negative_zero() {
        assert_eq!(format_percentage(-0.2), "0");
        assert_eq!(format_percentage(0.0), "0");
        assert_eq!(format_percentage(49.6), "50");
        assert_eq!(format_percentage(-12.3), "-12");
    }

    #[test]
    fn cards_show_all_three_metrics() {
        let metrics = MonthlyMetrics {
            income: 3000.0,
            expenses: 1200.0,
            balance: 1800.0,
            income_change: 50.0,
            expenses_change: -25.0,
        };

        let markup = metric_cards(&metrics).into_string();

        assert!(markup.contains("$3,000.00"));
        assert!(markup.contains("$1,200.00"));
        assert!(markup.contains("$1,800.00"));
        assert!(markup.contains("50% vs last month"));
        assert!(markup.contains("-25% vs last month"));
    }
}
