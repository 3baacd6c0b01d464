//! The recent-transactions table on the dashboard.

use maud::{Markup, html};

use crate::{
    category::TransactionKind,
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::Transaction,
};

/// Renders a table of the most recent transactions.
///
/// `transactions` should already be sorted by date descending and limited to
/// the number of rows the dashboard shows.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html!(
        div class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

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
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                td class=(TABLE_CELL_STYLE) { (transaction.kind) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                                }
                                (amount_cell(transaction))
                            }
                        }
                    }
                }
            }
        }
    )
}

/// The amount cell, green for income and red for expenses.
fn amount_cell(transaction: &Transaction) -> Markup {
    let (style, text) = match transaction.kind {
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
        td class={(TABLE_CELL_STYLE) " font-medium " (style)} { (text) }
    )
}
