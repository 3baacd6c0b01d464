//! Transaction data aggregation and transformation for the dashboard.
//!
//! Provides pure functions to bucket transactions by calendar period and
//! split the sums by kind, to group totals by category, and to compute the
//! month-over-month percentage changes shown on the metric cards.

use std::collections::HashMap;

use time::{Date, Duration, Month};

use crate::{category::TransactionKind, transaction::Transaction};

/// A fixed calendar period used to group transactions for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Bucketing {
    /// One bucket per calendar date.
    #[allow(dead_code)]
    Day,
    /// One bucket per calendar week, keyed by its ending Sunday.
    Week,
    /// One bucket per calendar month, keyed by the first of the month.
    Month,
    /// One bucket per calendar year, keyed by January 1st.
    Year,
}

/// Income and expense sums for one bucket.
///
/// A bucket that only has transactions of one kind keeps 0.0 for the other,
/// so both series always line up on the charts.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(super) struct KindTotals {
    pub income: f64,
    pub expense: f64,
}

impl KindTotals {
    fn add(&mut self, kind: TransactionKind, amount: f64) {
        match kind {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expense += amount,
        }
    }
}

/// Maps a date to the key of the bucket it falls in.
pub(super) fn bucket_date(bucketing: Bucketing, date: Date) -> Date {
    match bucketing {
        Bucketing::Day => date,
        Bucketing::Week => week_ending(date),
        Bucketing::Month => date.replace_day(1).unwrap(),
        Bucketing::Year => Date::from_calendar_date(date.year(), Month::January, 1).unwrap(),
    }
}

/// The Sunday on or after `date`, i.e. the end of its calendar week.
fn week_ending(date: Date) -> Date {
    let days_until_sunday = (7 - date.weekday().number_from_monday() as i64) % 7;
    date + Duration::days(days_until_sunday)
}

/// Aggregates transaction amounts per bucket, split by kind.
///
/// # Returns
/// HashMap mapping each bucket key present in the data to its income and
/// expense sums.
pub(super) fn aggregate_by_bucket(
    transactions: &[Transaction],
    bucketing: Bucketing,
) -> HashMap<Date, KindTotals> {
    let mut totals: HashMap<Date, KindTotals> = HashMap::new();

    for transaction in transactions {
        let bucket = bucket_date(bucketing, transaction.date);
        totals
            .entry(bucket)
            .or_default()
            .add(transaction.kind, transaction.amount);
    }

    totals
}

/// Extracts the bucket keys in chronological order.
pub(super) fn get_sorted_buckets(totals: &HashMap<Date, KindTotals>) -> Vec<Date> {
    let mut sorted: Vec<Date> = totals.keys().copied().collect();
    sorted.sort();
    sorted
}

/// The percentage change from `previous` to `current`.
///
/// Defined as 0.0 when `previous` is zero to avoid division by zero. This is
/// a display policy, not a mathematical identity: callers must not read 0 as
/// "no change" when the previous period was legitimately zero.
pub(super) fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Groups all transactions by category (no time bucketing), split by kind.
///
/// # Returns
/// Category names with their totals, sorted alphabetically for a stable
/// chart axis.
pub(super) fn aggregate_by_category(transactions: &[Transaction]) -> Vec<(String, KindTotals)> {
    let mut totals: HashMap<&str, KindTotals> = HashMap::new();

    for transaction in transactions {
        totals
            .entry(transaction.category.as_ref())
            .or_default()
            .add(transaction.kind, transaction.amount);
    }

    let mut sorted: Vec<(String, KindTotals)> = totals
        .into_iter()
        .map(|(category, totals)| (category.to_owned(), totals))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
}

/// The figures shown on the dashboard metric cards.
#[derive(Debug, PartialEq)]
pub(super) struct MonthlyMetrics {
    /// Income earned in the month of `today`.
    pub income: f64,
    /// Expenses paid in the month of `today`.
    pub expenses: f64,
    /// Income minus expenses for the month of `today`.
    pub balance: f64,
    /// Percentage change of income versus the previous month.
    pub income_change: f64,
    /// Percentage change of expenses versus the previous month.
    pub expenses_change: f64,
}

/// Calculates the current month's totals and their change versus last month.
pub(super) fn calculate_monthly_metrics(
    transactions: &[Transaction],
    today: Date,
) -> MonthlyMetrics {
    let current_month = bucket_date(Bucketing::Month, today);
    let previous_month = bucket_date(Bucketing::Month, current_month - Duration::days(1));

    let mut current = KindTotals::default();
    let mut previous = KindTotals::default();

    for transaction in transactions {
        let month = bucket_date(Bucketing::Month, transaction.date);
        if month == current_month {
            current.add(transaction.kind, transaction.amount);
        } else if month == previous_month {
            previous.add(transaction.kind, transaction.amount);
        }
    }

    MonthlyMetrics {
        income: current.income,
        expenses: current.expense,
        balance: current.income - current.expense,
        income_change: percent_change(current.income, previous.income),
        expenses_change: percent_change(current.expense, previous.expense),
    }
}

/// Formats bucket keys as chart axis labels.
pub(super) fn bucket_labels(bucketing: Bucketing, buckets: &[Date]) -> Vec<String> {
    buckets
        .iter()
        .map(|bucket| match bucketing {
            Bucketing::Day | Bucketing::Week => bucket.to_string(),
            Bucketing::Month => format!("{} {}", month_abbrev(bucket.month()), bucket.year()),
            Bucketing::Year => bucket.year().to_string(),
        })
        .collect()
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
