use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use booking_core::BookingError;
use tracing::error;

use crate::templates::{NotFoundTemplate, ServerErrorTemplate};

/// Maps storage failures onto distinct HTTP statuses at the handler
/// boundary: missing records render the 404 page, validation failures
/// answer 422, and everything else is logged and rendered as a 500.
pub struct WebError(BookingError);

pub type WebResult<T> = std::result::Result<T, WebError>;

impl From<BookingError> for WebError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.0 {
            BookingError::NotFound { .. } => {
                let body = NotFoundTemplate.render().unwrap_or_default();
                (StatusCode::NOT_FOUND, Html(body)).into_response()
            }
            BookingError::Validation { message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message).into_response()
            }
            err => {
                error!("Request failed: {}", err);
                let body = ServerErrorTemplate.render().unwrap_or_default();
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            }
        }
    }
}
