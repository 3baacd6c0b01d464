//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryName, TransactionKind},
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The maximum number of characters allowed in a transaction description.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned in this transaction. Always positive.
    pub amount: f64,
    /// The category the transaction belongs to, from the fixed catalog for its kind.
    pub category: CategoryName,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// Optional comma-separated free-text tags.
    pub tags: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        amount: f64,
        date: Date,
        kind: TransactionKind,
        category: CategoryName,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            amount,
            date,
            kind,
            category,
            description: String::new(),
            tags: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The required fields are set via [Transaction::build]; description and tags
/// default to empty. Pass the finished builder to [create_transaction] to
/// validate it and insert the row.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The ID of the user that will own the transaction.
    pub user_id: UserID,

    /// The monetary amount of the transaction.
    ///
    /// Amounts are always positive; the direction of the money flow is
    /// recorded separately in `kind`.
    pub amount: f64,

    /// The date when the transaction occurred.
    pub date: Date,

    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,

    /// The category of the transaction, e.g. "Groceries" or "Salary".
    ///
    /// [CategoryName::new] guarantees the category belongs to the catalog for
    /// `kind`.
    pub category: CategoryName,

    /// A human-readable description of the transaction, at most
    /// [DESCRIPTION_MAX_CHARS] characters.
    pub description: String,

    /// Optional comma-separated free-text tags, e.g. "work, urgent".
    pub tags: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the tags for the transaction.
    pub fn tags(mut self, tags: Option<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// The replacement field values for updating a transaction.
///
/// Updates replace every field except the transaction ID and the owning user
/// ID, which are immutable once assigned.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionUpdate {
    /// The new amount. Must be positive.
    pub amount: f64,
    /// The new category, valid for `kind`.
    pub category: CategoryName,
    /// The new description, at most [DESCRIPTION_MAX_CHARS] characters.
    pub description: String,
    /// The new date.
    pub date: Date,
    /// The new transaction kind.
    pub kind: TransactionKind,
    /// The new tags.
    pub tags: Option<String>,
}

fn validate_fields(amount: f64, description: &str) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount(amount));
    }

    let length = description.chars().count();
    if length > DESCRIPTION_MAX_CHARS {
        return Err(Error::DescriptionTooLong {
            limit: DESCRIPTION_MAX_CHARS,
            length,
        });
    }

    Ok(())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                kind TEXT NOT NULL,
                tags TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index used by the dashboard and transactions page queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - [Error::DescriptionTooLong] if the description has too many characters,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_fields(builder.amount, &builder.description)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, category, description, date, kind, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, amount, category, description, date, kind, tags",
        )?
        .query_row(
            (
                builder.user_id.as_i64(),
                builder.amount,
                builder.category.as_ref(),
                builder.description,
                builder.date,
                builder.kind.as_str(),
                builder.tags,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, category, description, date, kind, tags \
            FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all transactions owned by `user_id`, most recent first.
///
/// Rows are sorted by date descending and then by ID so the order stays
/// stable across updates.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, category, description, date, kind, tags \
            FROM \"transaction\" WHERE user_id = :user_id \
            ORDER BY date DESC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Replace every field of the transaction `id` owned by `user_id` except the
/// ID and the owner.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the new amount is zero or negative,
/// - [Error::DescriptionTooLong] if the new description has too many characters,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_fields(update.amount, &update.description)?;

    connection
        .prepare(
            "UPDATE \"transaction\" \
            SET amount = ?1, category = ?2, description = ?3, date = ?4, kind = ?5, tags = ?6 \
            WHERE id = ?7 AND user_id = ?8 \
            RETURNING id, user_id, amount, category, description, date, kind, tags",
        )?
        .query_row(
            (
                update.amount,
                update.category.as_ref(),
                update.description,
                update.date,
                update.kind.as_str(),
                update.tags,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingTransaction)
    } else {
        Ok(())
    }
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let amount = row.get(2)?;
    let raw_category: String = row.get(3)?;
    let description = row.get(4)?;
    let date = row.get(5)?;
    let raw_kind: String = row.get(6)?;
    let tags = row.get(7)?;

    let kind = raw_kind.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown transaction kind {raw_kind:?}").into(),
        )
    })?;

    Ok(Transaction {
        id,
        user_id,
        amount,
        category: CategoryName::new_unchecked(&raw_category),
        description,
        date,
        kind,
        tags,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        category::{CategoryName, TransactionKind},
        db::initialize,
        transaction::{
            Transaction, TransactionUpdate, count_transactions, create_transaction,
            delete_transaction, get_transaction, get_transactions_for_user, update_transaction,
        },
    };

    fn get_test_connection() -> (Connection, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("alice", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        (conn, user.id)
    }

    fn expense_category(name: &str) -> CategoryName {
        CategoryName::new(TransactionKind::Expense, name).unwrap()
    }

    #[test]
    fn create_succeeds() {
        let (conn, user_id) = get_test_connection();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(
                user_id,
                amount,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            )
            .description("weekly shop")
            .tags(Some("food, household".to_owned())),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.user_id, user_id);
                assert_eq!(transaction.description, "weekly shop");
                assert_eq!(transaction.tags, Some("food, household".to_owned()));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_zero_amount() {
        let (conn, user_id) = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                user_id,
                0.0,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(0.0)));
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let (conn, user_id) = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                user_id,
                -5.0,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(-5.0)));
    }

    #[test]
    fn create_fails_on_over_long_description() {
        let (conn, user_id) = get_test_connection();
        let description = "x".repeat(201);

        let result = create_transaction(
            Transaction::build(
                user_id,
                10.0,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            )
            .description(&description),
            &conn,
        );

        assert_eq!(
            result,
            Err(Error::DescriptionTooLong {
                limit: 200,
                length: 201
            })
        );
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let (conn, user_id) = get_test_connection();

        let created = create_transaction(
            Transaction::build(
                user_id,
                42.5,
                date!(2025 - 03 - 14),
                TransactionKind::Income,
                CategoryName::new(TransactionKind::Income, "Salary").unwrap(),
            )
            .description("March salary")
            .tags(Some("work".to_owned())),
            &conn,
        )
        .unwrap();

        let listed = get_transactions_for_user(user_id, &conn).unwrap();

        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn list_returns_most_recent_first() {
        let (conn, user_id) = get_test_connection();
        for (amount, date) in [
            (1.0, date!(2025 - 01 - 01)),
            (2.0, date!(2025 - 03 - 01)),
            (3.0, date!(2025 - 02 - 01)),
        ] {
            create_transaction(
                Transaction::build(
                    user_id,
                    amount,
                    date,
                    TransactionKind::Expense,
                    expense_category("Groceries"),
                ),
                &conn,
            )
            .unwrap();
        }

        let listed = get_transactions_for_user(user_id, &conn).unwrap();

        let dates: Vec<_> = listed.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 03 - 01),
                date!(2025 - 02 - 01),
                date!(2025 - 01 - 01)
            ]
        );
    }

    #[test]
    fn list_excludes_other_users_transactions() {
        let (conn, user_id) = get_test_connection();
        let other_user =
            create_user("bob", PasswordHash::new_unchecked("hunter3"), &conn).unwrap();
        create_transaction(
            Transaction::build(
                other_user.id,
                99.0,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            ),
            &conn,
        )
        .unwrap();

        let listed = get_transactions_for_user(user_id, &conn).unwrap();

        assert!(listed.is_empty(), "got {listed:?}, want no transactions");
    }

    #[test]
    fn update_replaces_all_fields_except_ids() {
        let (conn, user_id) = get_test_connection();
        let created = create_transaction(
            Transaction::build(
                user_id,
                10.0,
                date!(2025 - 01 - 01),
                TransactionKind::Expense,
                expense_category("Groceries"),
            )
            .description("before"),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            created.id,
            user_id,
            TransactionUpdate {
                amount: 20.0,
                category: CategoryName::new(TransactionKind::Income, "Salary").unwrap(),
                description: "after".to_owned(),
                date: date!(2025 - 02 - 02),
                kind: TransactionKind::Income,
                tags: Some("updated".to_owned()),
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_id, user_id);
        assert_eq!(updated.amount, 20.0);
        assert_eq!(updated.description, "after");
        assert_eq!(updated.date, date!(2025 - 02 - 02));
        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.tags, Some("updated".to_owned()));
        assert_eq!(get_transaction(created.id, user_id, &conn).unwrap(), updated);
    }

    #[test]
    fn update_fails_on_missing_transaction() {
        let (conn, user_id) = get_test_connection();

        let result = update_transaction(
            42,
            user_id,
            TransactionUpdate {
                amount: 20.0,
                category: expense_category("Groceries"),
                description: String::new(),
                date: date!(2025 - 02 - 02),
                kind: TransactionKind::Expense,
                tags: None,
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn update_fails_for_other_users_transaction() {
        let (conn, user_id) = get_test_connection();
        let other_user =
            create_user("bob", PasswordHash::new_unchecked("hunter3"), &conn).unwrap();
        let created = create_transaction(
            Transaction::build(
                other_user.id,
                10.0,
                date!(2025 - 01 - 01),
                TransactionKind::Expense,
                expense_category("Groceries"),
            ),
            &conn,
        )
        .unwrap();

        let result = update_transaction(
            created.id,
            user_id,
            TransactionUpdate {
                amount: 20.0,
                category: expense_category("Groceries"),
                description: String::new(),
                date: date!(2025 - 02 - 02),
                kind: TransactionKind::Expense,
                tags: None,
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_then_list_excludes_deleted_id() {
        let (conn, user_id) = get_test_connection();
        let keep = create_transaction(
            Transaction::build(
                user_id,
                1.0,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            ),
            &conn,
        )
        .unwrap();
        let remove = create_transaction(
            Transaction::build(
                user_id,
                2.0,
                date!(2025 - 10 - 05),
                TransactionKind::Expense,
                expense_category("Groceries"),
            ),
            &conn,
        )
        .unwrap();

        delete_transaction(remove.id, user_id, &conn).unwrap();

        let listed = get_transactions_for_user(user_id, &conn).unwrap();
        assert!(listed.iter().all(|t| t.id != remove.id));
        assert!(listed.iter().any(|t| t.id == keep.id));
    }

    #[test]
    fn delete_fails_on_missing_transaction() {
        let (conn, user_id) = get_test_connection();

        let result = delete_transaction(42, user_id, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn get_count() {
        let (conn, user_id) = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(
                    user_id,
                    i as f64,
                    today,
                    TransactionKind::Expense,
                    expense_category("Groceries"),
                ),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
