use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use roboto::RobotoError;
use tracing::error;

/// Error returned by the robots/sitemap handlers.
///
/// Served as `text/plain` so crawlers never mistake it for a partial
/// robots.txt or sitemap.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

impl From<RobotoError> for ApiError {
    fn from(err: RobotoError) -> Self {
        error!("document generation failed: {err}");
        match err {
            RobotoError::InvalidOrigin { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}
