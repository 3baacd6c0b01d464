//! The fixed category catalog, keyed by transaction kind.
//!
//! Category lists are configuration data defined once here and referenced by
//! the forms and the validation code, never inlined into the views.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether a transaction records money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. salary or interest.
    Income,
    /// Money spent, e.g. groceries or rent.
    Expense,
}

impl TransactionKind {
    /// The kind as the lowercase string stored in the database and used in
    /// query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction kind {other:?}")),
        }
    }
}

/// The categories available for income transactions.
pub const INCOME_CATEGORIES: [&str; 13] = [
    "Salary",
    "Freelance",
    "Investments",
    "Dividends",
    "Rental Income",
    "Business Income",
    "Side Hustle",
    "Gifts",
    "Refunds",
    "Interest Income",
    "Pension",
    "Social Security",
    "Other Income",
];

/// The categories available for expense transactions.
pub const EXPENSE_CATEGORIES: [&str; 41] = [
    "Food & Dining",
    "Groceries",
    "Restaurants",
    "Takeout",
    "Housing",
    "Rent",
    "Mortgage",
    "Utilities",
    "Maintenance",
    "Transport",
    "Fuel",
    "Public Transport",
    "Car Maintenance",
    "Insurance",
    "Entertainment",
    "Movies",
    "Streaming Services",
    "Games",
    "Healthcare",
    "Medical Bills",
    "Pharmacy",
    "Education",
    "Tuition",
    "Books",
    "Courses",
    "Shopping",
    "Clothing",
    "Electronics",
    "Home Goods",
    "Personal Care",
    "Travel",
    "Flights",
    "Hotels",
    "Vacation",
    "Bills & Utilities",
    "Internet",
    "Phone",
    "Electricity",
    "Water",
    "Gas",
    "Other Expenses",
];

/// Get the catalog of valid categories for `kind`.
pub fn categories_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => &INCOME_CATEGORIES,
        TransactionKind::Expense => &EXPENSE_CATEGORIES,
    }
}

/// A category name validated against the catalog for a transaction kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, checking it belongs to the catalog for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidCategory] if `name` is not in the catalog
    /// for `kind`.
    pub fn new(kind: TransactionKind, name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if categories_for(kind).contains(&name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidCategory {
                kind,
                category: name.to_string(),
            })
        }
    }

    /// Create a category name without checking it against the catalog.
    ///
    /// The caller should ensure that the string came from the catalog, e.g.
    /// when mapping a database row that was validated at insert time.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the catalog invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
