//! Alert fragments swapped into the alert container by HTMX error targets.

use maud::{Markup, html};

/// A dismissable alert shown at the bottom of the page.
pub struct AlertTemplate;

impl AlertTemplate {
    /// An error alert with a `title` and a `message` explaining what went
    /// wrong and what the user can do about it.
    pub fn error(title: &str, message: &str) -> Markup {
        html!(
            div
                id="alert"
                role="alert"
                class="block w-full p-4 mb-4 text-red-800 border border-red-300
                    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400
                    dark:border-red-800"
            {
                div class="flex items-center"
                {
                    h3 class="text-lg font-medium" { (title) }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 bg-red-50 text-red-500
                            rounded-lg focus:ring-2 focus:ring-red-400 p-1.5
                            hover:bg-red-200 inline-flex items-center justify-center
                            h-8 w-8 dark:bg-gray-800 dark:text-red-400
                            dark:hover:bg-gray-700"
                        aria-label="Close"
                        onclick="this.closest('#alert').remove()"
                    {
                        "✕"
                    }
                }

                div class="mt-2 mb-2 text-sm" { (message) }
            }
        )
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::AlertTemplate;

    #[test]
    fn error_alert_contains_title_and_message() {
        let markup = AlertTemplate::error("Something broke", "Try again later.");

        let html = Html::parse_fragment(&markup.into_string());
        let title_selector = Selector::parse("h3").unwrap();
        let title = html
            .select(&title_selector)
            .next()
            .expect("alert should have a title")
            .text()
            .collect::<String>();

        assert_eq!(title, "Something broke");
        assert!(html.html().contains("Try again later."));
    }
}
