//! The registration page for creating an account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, create_user, password::PASSWORD_MIN_LENGTH},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner, log_in_register,
        password_input,
    },
    internal_server_error::InternalServerError,
};

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

fn username_input(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="username"
                class=(FORM_LABEL_STYLE)
            {
                "Username"
            }

            input
                type="text"
                name="username"
                id="username"
                placeholder="Choose a username"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(username);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn registration_form(
    username: &str,
    username_error_message: Option<&str>,
    password_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, username_error_message))
            (password_input("", PASSWORD_MIN_LENGTH as u8, password_error_message))
            (confirm_password_input(PASSWORD_MIN_LENGTH as u8, confirm_password_error_message))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Passwords need at least eight characters including an
                uppercase letter, a number and a special character."
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None, None, None);
    let content = log_in_register("Create Account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the client is redirected to the log-in page. Validation errors
/// are rendered back into the form next to the field that caused them.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    if user_data.username.trim().is_empty() {
        return registration_form(
            &user_data.username,
            Some("Please enter a username."),
            None,
            None,
        )
        .into_response();
    }

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) => password,
        Err(error) => {
            return registration_form(
                &user_data.username,
                None,
                Some(error.to_string().as_ref()),
                None,
            )
            .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return registration_form(
            &user_data.username,
            None,
            None,
            Some("Passwords do not match"),
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("an error occurred while hashing a password: {e}");

            return InternalServerError::default().into_response();
        }
    };

    let create_result = create_user(
        &user_data.username,
        password_hash,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    );

    match create_result {
        Ok(_) => (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UsernameTaken) => registration_form(
            &user_data.username,
            Some("That username is already taken, please choose another."),
            None,
            None,
        )
        .into_response(),
        Err(e) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {e}");

            InternalServerError::default().into_response()
        }
    }
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, count_users, create_user},
        db::initialize,
        endpoints,
    };

    use super::{RegisterForm, RegistrationState, register_user};

    fn get_test_state() -> RegistrationState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        RegistrationState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: RegistrationState) -> TestServer {
        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(state);

        TestServer::new(app)
    }

    fn register_form(username: &str, password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    const STRONG_PASSWORD: &str = "Correct4Horse!BatteryStaple";

    #[tokio::test]
    async fn create_user_succeeds() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        server
            .post(endpoints::USERS)
            .form(&register_form("alice", STRONG_PASSWORD, STRONG_PASSWORD))
            .await
            .assert_status_see_other();

        let count = count_users(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(count, 1, "want 1 user after registration, got {count}");
    }

    #[tokio::test]
    async fn create_user_fails_with_duplicate_username() {
        let state = get_test_state();
        create_user(
            "alice",
            PasswordHash::from_raw_password(STRONG_PASSWORD, 4).unwrap(),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test user");
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::USERS)
            .form(&register_form("alice", STRONG_PASSWORD, STRONG_PASSWORD))
            .await;

        response.assert_status_ok();
        let text = response.text().to_lowercase();
        assert!(
            text.contains("already taken"),
            "'{text}' does not contain the text 'already taken'"
        );
    }

    #[tokio::test]
    async fn create_user_fails_when_password_is_weak() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .form(&register_form("alice", "foo", "foo"))
            .await;

        response.assert_status_ok();
        let text = response.text().to_lowercase();
        assert!(
            text.contains("at least 8 characters"),
            "'{text}' does not explain the password length requirement"
        );
    }

    #[tokio::test]
    async fn create_user_fails_when_passwords_do_not_match() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .form(&register_form(
                "alice",
                STRONG_PASSWORD,
                "ThisIsADifferent1!Password",
            ))
            .await;

        response.assert_status_ok();
        let text = response.text().to_lowercase();
        assert!(
            text.contains("passwords do not match"),
            "'{text}' does not contain the text 'passwords do not match'"
        );
    }

    #[tokio::test]
    async fn create_user_fails_with_empty_username() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .form(&register_form("  ", STRONG_PASSWORD, STRONG_PASSWORD))
            .await;

        response.assert_status_ok();
        let text = response.text().to_lowercase();
        assert!(
            text.contains("please enter a username"),
            "'{text}' does not ask for a username"
        );
    }
}
