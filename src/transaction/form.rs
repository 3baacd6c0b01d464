//! The shared field markup for the create and edit transaction forms.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::{EXPENSE_CATEGORIES, INCOME_CATEGORIES, TransactionKind},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::DESCRIPTION_MAX_CHARS,
};

/// The values used to pre-fill the transaction form.
pub(super) struct TransactionFormValues<'a> {
    pub kind: TransactionKind,
    /// `None` renders an empty amount input.
    pub amount: Option<f64>,
    /// The selected category, if any.
    pub category: Option<&'a str>,
    /// The initial value of the date input.
    pub date: Date,
    /// The latest date the date input accepts.
    pub max_date: Date,
    pub description: &'a str,
    pub tags: &'a str,
}

impl TransactionFormValues<'_> {
    /// Empty form defaults for the create page.
    pub(super) fn empty(today: Date) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: None,
            category: None,
            date: today,
            max_date: today,
            description: "",
            tags: "",
        }
    }
}

/// Renders the shared input fields of the transaction form.
///
/// The category select lists both catalogs in labelled groups; the server
/// rejects a category that does not match the selected kind.
pub(super) fn transaction_form_fields(values: &TransactionFormValues) -> Markup {
    html! {
        fieldset
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for (kind, label) in [
                    (TransactionKind::Income, "Income"),
                    (TransactionKind::Expense, "Expense"),
                ] {
                    div class="flex flex-1 items-center gap-2"
                    {
                        input
                            type="radio"
                            name="kind"
                            id=(format!("kind-{kind}"))
                            value=(kind.as_str())
                            checked[values.kind == kind]
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for=(format!("kind-{kind}"))
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (label)
                        }
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    value=[values.amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected[values.category.is_none()] { "Select a category" }

                optgroup label="Income"
                {
                    @for name in INCOME_CATEGORIES {
                        option value=(name) selected[values.category == Some(name)] { (name) }
                    }
                }

                optgroup label="Expense"
                {
                    @for name in EXPENSE_CATEGORIES {
                        option value=(name) selected[values.category == Some(name)] { (name) }
                    }
                }
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(values.max_date)
                required
                value=(values.date)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description (optional)"
                maxlength=(DESCRIPTION_MAX_CHARS)
                value=(values.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="tags"
                class=(FORM_LABEL_STYLE)
            {
                "Tags"
            }

            input
                name="tags"
                id="tags"
                type="text"
                placeholder="Comma-separated tags (optional)"
                value=(values.tags)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
