//! User accounts and cookie-based authentication.
//!
//! This module contains everything related to identity:
//! - The `User` model, user table and queries
//! - Password validation and hashing
//! - The auth token cookie and the middleware that guards routes
//! - View handlers for the log-in, registration and log-out flows

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{get_register_page, register_user};
pub(super) use token::Token;
pub use user::{User, UserID, create_user, create_user_table, get_user_by_id, get_user_by_username};

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;

#[cfg(test)]
pub use user::count_users;
