//! Defines the route handler for the page that displays, filters and manages transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::TransactionKind,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    timezone::local_date_today,
    transaction::{
        Transaction,
        core::get_transactions_for_user,
        filter::{
            AmountFilter, FilterQuery, FilterSummary, KindFilter, TransactionFilter, WindowFilter,
            summarize,
        },
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render an overview of the user's transactions with filter controls,
/// summary statistics, and edit/delete actions per row.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
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

        get_transactions_for_user(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let filter = query.into_filter();
    let filtered = filter.apply(&transactions, today);
    let summary = summarize(&filtered);

    // The category options come from the data, so the select only offers
    // values that can actually match something.
    let mut categories: Vec<String> = transactions
        .iter()
        .map(|transaction| transaction.category.to_string())
        .collect();
    categories.sort();
    categories.dedup();

    let has_any_transactions = !transactions.is_empty();

    Ok(
        transactions_view(&filter, &categories, &filtered, &summary, has_any_transactions)
            .into_response(),
    )
}

fn transactions_view(
    filter: &TransactionFilter,
    categories: &[String],
    transactions: &[&Transaction],
    summary: &FilterSummary,
    has_any_transactions: bool,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = if has_any_transactions {
        let export_url = format!(
            "{}?{}",
            endpoints::EXPORT_TRANSACTIONS,
            filter.to_query_string()
        );

        html!(
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE)
            {
                div class="w-full max-w-screen-xl"
                {
                    h2 class="text-xl font-bold mb-4" { "Transactions" }

                    (filter_form(filter, categories))
                    (summary_cards(summary))

                    div class="flex justify-end mb-2"
                    {
                        a href=(export_url) class=(LINK_STYLE) { "Export to CSV" }
                    }

                    (transactions_table(transactions))
                }
            }
        )
    } else {
        let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "add your first transaction");

        html!(
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE)
            {
                h2 class="text-xl font-bold" { "Nothing here yet..." }

                p
                {
                    "Your transactions will show up here once you " (new_transaction_link) "."
                }
            }
        )
    };

    base("Transactions", &[], &content)
}

fn filter_form(filter: &TransactionFilter, categories: &[String]) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-2 lg:grid-cols-5 gap-4 items-end mb-6
                bg-gray-100 dark:bg-gray-800 p-4 rounded-lg"
        {
            div
            {
                label for="range" class=(FORM_LABEL_STYLE) { "Date Range" }

                select name="range" id="range" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for window in WindowFilter::all() {
                        option
                            value=(window.as_query_value())
                            selected[filter.window == window]
                        {
                            (window.label())
                        }
                    }
                }
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Transaction Type" }

                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for kind in KindFilter::all() {
                        option
                            value=(kind.as_query_value())
                            selected[filter.kind == kind]
                        {
                            (kind.label())
                        }
                    }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="all" selected[filter.category.is_none()] { "All" }

                    @for category in categories {
                        option
                            value=(category)
                            selected[filter.category.as_deref() == Some(category.as_str())]
                        {
                            (category)
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount Range" }

                select name="amount" id="amount" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for amount in AmountFilter::all() {
                        option
                            value=(amount.as_query_value())
                            selected[filter.amount == amount]
                        {
                            (amount.label())
                        }
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2.5 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                    hover:dark:bg-blue-700 text-white rounded text-sm font-medium"
            {
                "Apply Filters"
            }
        }
    )
}

fn summary_cards(summary: &FilterSummary) -> Markup {
    let average = summary
        .average
        .map(format_currency)
        .unwrap_or_else(|| "—".to_owned());

    html!(
        div class="grid grid-cols-1 sm:grid-cols-3 gap-4 mb-6"
        {
            div class=(CARD_STYLE)
            {
                div class="text-sm text-gray-600 dark:text-gray-400" { "Total Amount" }
                div class="text-2xl font-bold" { (format_currency(summary.total)) }
            }

            div class=(CARD_STYLE)
            {
                div class="text-sm text-gray-600 dark:text-gray-400" { "Average Amount" }
                div class="text-2xl font-bold" { (average) }
            }

            div class=(CARD_STYLE)
            {
                div class="text-sm text-gray-600 dark:text-gray-400" { "Number of Transactions" }
                div class="text-2xl font-bold" { (summary.count) }
            }
        }
    )
}

fn transactions_table(transactions: &[&Transaction]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Tags" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="7"
                            {
                                "No transactions match the selected filters."
                            }
                        }
                    }

                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    )
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    let (amount_style, amount_text) = match transaction.kind {
        TransactionKind::Income => (
            "text-green-600 dark:text-green-400",
            format_currency(transaction.amount),
        ),
        TransactionKind::Expense => (
            "text-red-600 dark:text-red-400",
            format_currency(-transaction.amount),
        ),
    };

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }

            td class=(TABLE_CELL_STYLE) { (transaction.kind) }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }

            td class={(TABLE_CELL_STYLE) " font-medium " (amount_style)} { (amount_text) }

            td class=(TABLE_CELL_STYLE) { (transaction.description) }

            td class=(TABLE_CELL_STYLE) { (transaction.tags.as_deref().unwrap_or("")) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        hx-confirm="Delete this transaction?"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}
