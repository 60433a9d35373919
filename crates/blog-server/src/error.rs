// crates/blog-server/src/error.rs
// ============================================================================
// Module: API Errors
// Description: HTTP status mapping for domain errors and extractor rejections.
// Purpose: Give every failure the same `{"error": message}` body shape.
// Dependencies: axum, blog-core, tracing
// ============================================================================

//! ## Overview
//! [`ApiError`] is the single error type returned by route handlers. Domain
//! errors map onto 400/404/409/500; extractor rejections (malformed JSON,
//! missing query parameters, non-numeric path ids) collapse to 400 except for
//! oversized bodies, which keep 413.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use blog_core::BlogError;
use blog_core::ErrorResponse;
use tracing::debug;
use tracing::error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Error returned by HTTP handlers.
///
/// # Invariants
/// - `status` is a 4xx or 5xx code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status.
    status: StatusCode,
    /// Client-facing message.
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Creates a 400 error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 500 error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Maps a rejection status onto 400, keeping 413 for oversized bodies.
    fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::new(status, message)
        } else {
            Self::bad_request(message)
        }
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        let status = match &err {
            BlogError::Validation(_) | BlogError::BadRequest(_) | BlogError::Image(_) => {
                StatusCode::BAD_REQUEST
            }
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::Conflict(_) => StatusCode::CONFLICT,
            BlogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::from_rejection(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, "request failed");
        } else {
            debug!(status = self.status.as_u16(), message = %self.message, "request rejected");
        }
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
