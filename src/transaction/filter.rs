//! The filter engine for the transactions page and the CSV export.
//!
//! A filter is a conjunction of four independently optional predicates: a
//! relative date window, the transaction kind, the category and an amount
//! band. Disabled predicates accept every transaction, so the default filter
//! returns the input unchanged.

use serde::Deserialize;
use time::{Date, Duration};

use crate::category::TransactionKind;

use super::core::Transaction;

/// A relative date window anchored to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowFilter {
    /// No date restriction.
    #[default]
    AllTime,
    /// The last 7 days, including today.
    LastWeek,
    /// The last 30 days, including today.
    LastMonth,
    /// The last 90 days, including today.
    LastQuarter,
    /// The last 365 days, including today.
    LastYear,
}

impl WindowFilter {
    /// How many days back the window reaches, or `None` for no restriction.
    pub fn days(self) -> Option<i64> {
        match self {
            Self::AllTime => None,
            Self::LastWeek => Some(7),
            Self::LastMonth => Some(30),
            Self::LastQuarter => Some(90),
            Self::LastYear => Some(365),
        }
    }

    /// The label shown in the filter select.
    pub fn label(self) -> &'static str {
        match self {
            Self::AllTime => "All Time",
            Self::LastWeek => "Last 7 Days",
            Self::LastMonth => "Last 30 Days",
            Self::LastQuarter => "Last 3 Months",
            Self::LastYear => "Last Year",
        }
    }

    /// The value used in the page's query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::AllTime => "all-time",
            Self::LastWeek => "last-week",
            Self::LastMonth => "last-month",
            Self::LastQuarter => "last-quarter",
            Self::LastYear => "last-year",
        }
    }

    /// Every window preset, in the order shown in the filter select.
    pub fn all() -> [Self; 5] {
        [
            Self::AllTime,
            Self::LastWeek,
            Self::LastMonth,
            Self::LastQuarter,
            Self::LastYear,
        ]
    }

    fn accepts(self, date: Date, today: Date) -> bool {
        match self.days() {
            Some(days) => date >= today - Duration::days(days),
            None => true,
        }
    }
}

/// An optional exact-match predicate on the transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    /// Both income and expense transactions.
    #[default]
    All,
    /// Only income transactions.
    Income,
    /// Only expense transactions.
    Expense,
}

impl KindFilter {
    /// The kind to match, or `None` when the predicate is disabled.
    pub fn kind(self) -> Option<TransactionKind> {
        match self {
            Self::All => None,
            Self::Income => Some(TransactionKind::Income),
            Self::Expense => Some(TransactionKind::Expense),
        }
    }

    /// The label shown in the filter select.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// The value used in the page's query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Every kind preset, in the order shown in the filter select.
    pub fn all() -> [Self; 3] {
        [Self::All, Self::Income, Self::Expense]
    }

    fn accepts(self, kind: TransactionKind) -> bool {
        match self.kind() {
            Some(wanted) => kind == wanted,
            None => true,
        }
    }
}

/// An optional amount band predicate.
///
/// The four bands partition the positive number line: (0, 100], (100, 500],
/// (500, 1000] and (1000, inf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AmountFilter {
    /// Any amount.
    #[default]
    #[serde(rename = "all")]
    All,
    /// Amounts up to and including 100.
    #[serde(rename = "under-100")]
    UpTo100,
    /// Amounts over 100 up to and including 500.
    #[serde(rename = "100-500")]
    To500,
    /// Amounts over 500 up to and including 1000.
    #[serde(rename = "500-1000")]
    To1000,
    /// Amounts over 1000.
    #[serde(rename = "over-1000")]
    Over1000,
}

impl AmountFilter {
    /// The label shown in the filter select.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::UpTo100 => "0-100",
            Self::To500 => "100-500",
            Self::To1000 => "500-1000",
            Self::Over1000 => "1000+",
        }
    }

    /// The value used in the page's query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::UpTo100 => "under-100",
            Self::To500 => "100-500",
            Self::To1000 => "500-1000",
            Self::Over1000 => "over-1000",
        }
    }

    /// Every amount preset, in the order shown in the filter select.
    pub fn all() -> [Self; 5] {
        [
            Self::All,
            Self::UpTo100,
            Self::To500,
            Self::To1000,
            Self::Over1000,
        ]
    }

    fn accepts(self, amount: f64) -> bool {
        match self {
            Self::All => true,
            Self::UpTo100 => amount <= 100.0,
            Self::To500 => amount > 100.0 && amount <= 500.0,
            Self::To1000 => amount > 500.0 && amount <= 1000.0,
            Self::Over1000 => amount > 1000.0,
        }
    }
}

/// A conjunction of independently optional predicates over transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// The relative date window predicate.
    pub window: WindowFilter,
    /// The transaction kind predicate.
    pub kind: KindFilter,
    /// An exact category match, or `None` for no category restriction.
    pub category: Option<String>,
    /// The amount band predicate.
    pub amount: AmountFilter,
}

impl TransactionFilter {
    /// Return the transactions satisfying all active predicates, preserving
    /// the input order.
    ///
    /// `today` anchors the relative date window. An empty input or a filter
    /// that rejects everything yields an empty vec, not an error.
    pub fn apply<'a>(&self, transactions: &'a [Transaction], today: Date) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction, today))
            .collect()
    }

    fn matches(&self, transaction: &Transaction, today: Date) -> bool {
        self.window.accepts(transaction.date, today)
            && self.kind.accepts(transaction.kind)
            && self
                .category
                .as_deref()
                .map(|category| transaction.category.as_ref() == category)
                .unwrap_or(true)
            && self.amount.accepts(transaction.amount)
    }
}

/// The filter selection as it arrives in the transactions page query string.
///
/// Missing parameters leave their predicate disabled, so a plain GET of the
/// page shows everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    /// The date window preset.
    pub range: Option<WindowFilter>,
    /// The transaction kind preset.
    pub kind: Option<KindFilter>,
    /// The category to match; "all" or an empty string disables the predicate.
    pub category: Option<String>,
    /// The amount band preset.
    pub amount: Option<AmountFilter>,
}

impl FilterQuery {
    /// Convert the raw query parameters into a [TransactionFilter].
    pub fn into_filter(self) -> TransactionFilter {
        TransactionFilter {
            window: self.range.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            category: self
                .category
                .filter(|category| category != "all" && !category.is_empty()),
            amount: self.amount.unwrap_or_default(),
        }
    }
}

impl TransactionFilter {
    /// Encode the filter back into the page's query string, e.g. for the
    /// CSV export link.
    pub fn to_query_string(&self) -> String {
        let category = self.category.as_deref().unwrap_or("all");
        serde_urlencoded::to_string([
            ("range", self.window.as_query_value()),
            ("kind", self.kind.as_query_value()),
            ("category", category),
            ("amount", self.amount.as_query_value()),
        ])
        .unwrap_or_default()
    }
}

/// Summary statistics over a filtered transaction collection.
#[derive(Debug, PartialEq)]
pub struct FilterSummary {
    /// The sum of all amounts.
    pub total: f64,
    /// The arithmetic mean of the amounts, or `None` for an empty collection.
    pub average: Option<f64>,
    /// The number of transactions.
    pub count: usize,
}

/// Compute the total, average and count for a filtered collection.
pub fn summarize(transactions: &[&Transaction]) -> FilterSummary {
    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    let count = transactions.len();
    let average = if count == 0 {
        None
    } else {
        Some(total / count as f64)
    };

    FilterSummary {
        total,
        average,
        count,
    }
}
