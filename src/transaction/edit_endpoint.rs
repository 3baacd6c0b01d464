//! Defines the endpoint for updating an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState,
    auth::UserID,
    category::CategoryName,
    endpoints,
    transaction::{TransactionId, TransactionUpdate, core::update_transaction},
};

use super::create_endpoint::TransactionForm;

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the fields of an existing transaction,
/// redirects to the transactions view on success.
///
/// Every field except the transaction ID and the owner is replaced with the
/// submitted values.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> impl IntoResponse {
    let category = match CategoryName::new(form.kind, &form.category) {
        Ok(category) => category,
        Err(error) => return error.into_alert_response(),
    };

    let update = TransactionUpdate {
        amount: form.amount,
        category,
        description: form.description.clone(),
        date: form.date,
        kind: form.kind,
        tags: form.normalized_tags(),
    };

    let connection = state.db_connection.lock().unwrap();

    if let Err(error) = update_transaction(transaction_id, user_id, update, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
