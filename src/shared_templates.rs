//! A shared helper for rendering maud markup as an HTML response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::Markup;

#[inline]
pub fn render(status_code: StatusCode, markup: Markup) -> Response {
    (status_code, markup).into_response()
}
