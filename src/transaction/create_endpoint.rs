//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    auth::UserID,
    category::{CategoryName, TransactionKind},
    endpoints,
    transaction::{Transaction, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The category for the transaction, valid for `kind`.
    pub category: String,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// Optional comma-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
}

impl TransactionForm {
    /// Tags with an empty or whitespace-only submission normalized to `None`.
    pub(super) fn normalized_tags(&self) -> Option<String> {
        self.tags
            .as_deref()
            .map(str::trim)
            .filter(|tags| !tags.is_empty())
            .map(str::to_owned)
    }
}

/// A route handler for creating a new transaction, redirects to the transactions view on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> impl IntoResponse {
    let category = match CategoryName::new(form.kind, &form.category) {
        Ok(category) => category,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = Transaction::build(user_id, form.amount, form.date, form.kind, category)
        .description(&form.description)
        .tags(form.normalized_tags());

    let connection = state.db_connection.lock().unwrap();

    if let Err(error) = create_transaction(transaction, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
