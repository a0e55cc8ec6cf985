use crate::render;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use zipline_core::{ResolveError, ShortenError};

pub type Result<T> = std::result::Result<T, AppError>;

/// Boundary error type: maps core failures onto HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed input, rejected before reaching the core.
    Validation(String),
    Shorten(ShortenError),
    Resolve(ResolveError),
}

impl From<ShortenError> for AppError {
    fn from(e: ShortenError) -> Self {
        Self::Shorten(e)
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, render::error_page(&message)).into_response()
            }
            AppError::Shorten(ShortenError::InvalidTtl) => (
                StatusCode::BAD_REQUEST,
                render::error_page("custom TTL must be a positive, in-range duration"),
            )
                .into_response(),
            AppError::Shorten(e) => {
                error!(error = %e, "shorten failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    render::error_page("could not shorten that URL right now"),
                )
                    .into_response()
            }
            AppError::Resolve(e) => {
                error!(error = %e, "resolve failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    render::error_page("could not look that link up right now"),
                )
                    .into_response()
            }
        }
    }
}
