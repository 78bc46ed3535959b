//! Map core errors to HTTP responses.

use crate::views;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tagboard_core::AppError;

/// Handler error: an [`AppError`] rendered as a page (or a redirect).
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::EmptyMessage => return Redirect::to("/").into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Key(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The message store is unavailable. Nothing was saved.".to_string(),
                )
            }
        };

        (status, Html(views::error_page(status, &message))).into_response()
    }
}
