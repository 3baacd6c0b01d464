//! Defines the endpoint for downloading the filtered transactions as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    timezone::local_date_today,
    transaction::{Transaction, core::get_transactions_for_user, filter::FilterQuery},
};

/// The state needed for the CSV export.
#[derive(Debug, Clone)]
pub struct ExportTransactionsState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that streams the user's transactions, restricted by the
/// same filter query as the transactions page, as a CSV download.
pub async fn export_transactions(
    State(state): State<ExportTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = local_date_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_for_user(user_id, &connection)?
    };

    let filter = query.into_filter();
    let filtered = filter.apply(&transactions, today);
    let csv = write_csv(&filtered)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

fn to_export_error(error: impl std::fmt::Display) -> Error {
    Error::CsvExportError(error.to_string())
}

/// Serialize transactions as CSV with a header row and one record per line.
fn write_csv(transactions: &[&Transaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "date",
            "kind",
            "category",
            "amount",
            "description",
            "tags",
        ])
        .map_err(to_export_error)?;

    for transaction in transactions {
        writer
            .write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.kind.as_str().to_owned(),
                transaction.category.to_string(),
                transaction.amount.to_string(),
                transaction.description.clone(),
                transaction.tags.clone().unwrap_or_default(),
            ])
            .map_err(to_export_error)?;
    }

    let bytes = writer.into_inner().map_err(to_export_error)?;

    String::from_utf8(bytes).map_err(to_export_error)
}
