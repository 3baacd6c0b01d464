//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::{MonthlyMetrics, calculate_monthly_metrics},
        cards::metric_cards,
        charts::{DashboardChart, category_chart, charts_script, monthly_chart, weekly_chart, yearly_chart},
        tables::recent_transactions_table,
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    timezone::local_date_today,
    transaction::{Transaction, get_transactions_for_user},
};

/// How many transactions the recent-transactions table shows.
const RECENT_TRANSACTIONS_COUNT: usize = 10;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
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

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let metrics = calculate_monthly_metrics(&transactions, today);
    let charts = build_dashboard_charts(&transactions);
    let recent = &transactions[..transactions.len().min(RECENT_TRANSACTIONS_COUNT)];

    Ok(dashboard_view(nav_bar, &metrics, &charts, recent).into_response())
}

/// Creates the array of dashboard charts from transaction data.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(transactions: &[Transaction]) -> [DashboardChart; 4] {
    [
        DashboardChart {
            id: "weekly-chart",
            options: weekly_chart(transactions).to_string(),
        },
        DashboardChart {
            id: "monthly-chart",
            options: monthly_chart(transactions).to_string(),
        },
        DashboardChart {
            id: "yearly-chart",
            options: yearly_chart(transactions).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(transactions).to_string(),
        },
    ]
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some transactions.
                Start by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with metric cards, charts, and the
/// recent-transactions table.
fn dashboard_view(
    nav_bar: NavBar,
    metrics: &MonthlyMetrics,
    charts: &[DashboardChart],
    recent_transactions: &[Transaction],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (metric_cards(metrics))

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }

            (recent_transactions_table(recent_transactions))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use std::sync::{Arc, Mutex};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        category::{CategoryName, TransactionKind},
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state() -> (DashboardState, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("alice", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        (
            DashboardState {
                db_connection: Arc::new(Mutex::new(conn)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let (state, user_id) = get_test_state();
        let today = OffsetDateTime::now_utc().date();

        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    user_id,
                    100.0,
                    today,
                    TransactionKind::Income,
                    CategoryName::new(TransactionKind::Income, "Salary").unwrap(),
                ),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    user_id,
                    50.0,
                    today - Duration::days(15),
                    TransactionKind::Expense,
                    CategoryName::new(TransactionKind::Expense, "Groceries").unwrap(),
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_valid_html(&html);

        // Check that charts are present
        assert_chart_exists(&html, "weekly-chart");
        assert_chart_exists(&html, "monthly-chart");
        assert_chart_exists(&html, "yearly-chart");
        assert_chart_exists(&html, "category-chart");

        // Check that the recent transactions table is present
        assert_table_exists(&html);
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let (state, user_id) = get_test_state();

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert!(
            html.html().contains("Nothing here yet"),
            "want the no-data prompt, got: {}",
            html.html()
        );
    }

    #[tokio::test]
    async fn dashboard_only_shows_own_transactions() {
        let (state, user_id) = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let other_user =
                create_user("bob", PasswordHash::new_unchecked("hunter3"), &connection).unwrap();
            create_transaction(
                Transaction::build(
                    other_user.id,
                    100.0,
                    OffsetDateTime::now_utc().date(),
                    TransactionKind::Income,
                    CategoryName::new(TransactionKind::Income, "Salary").unwrap(),
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html(response).await;
        assert!(
            html.html().contains("Nothing here yet"),
            "another user's data must not appear on the dashboard"
        );
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    #[track_caller]
    fn assert_table_exists(html: &Html) {
        let selector = Selector::parse("table").unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Recent transactions table not found"
        );
    }
}
