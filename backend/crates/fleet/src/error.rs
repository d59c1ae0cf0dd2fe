//! Fleet Error Types
//!
//! Fleet-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Fleet-specific result type alias
pub type FleetResult<T> = Result<T, FleetError>;

#[derive(Debug, Error)]
pub enum FleetError {
    /// Malformed request field
    #[error("{0}")]
    Validation(String),

    /// Unique name taken, or a referenced row does not exist
    #[error("{0}")]
    Conflict(String),

    #[error("object storage is not enabled")]
    StorageDisabled,

    /// Repository or storage failure; keeps the original kind
    #[error(transparent)]
    App(#[from] AppError),
}

impl FleetError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FleetError::Validation(_) => ErrorKind::BadRequest,
            FleetError::Conflict(_) => ErrorKind::Conflict,
            FleetError::StorageDisabled => ErrorKind::InternalServerError,
            FleetError::App(e) => e.kind(),
        }
    }

    fn log(&self) {
        match self {
            FleetError::Validation(message) | FleetError::Conflict(message) => {
                tracing::debug!(%message, "Fleet request rejected");
            }
            FleetError::StorageDisabled => {
                tracing::warn!("Upload token requested while object storage is disabled");
            }
            FleetError::App(_) => {}
        }
    }
}

impl From<FleetError> for AppError {
    fn from(err: FleetError) -> Self {
        let (kind, message) = (err.kind(), err.to_string());
        match err {
            FleetError::App(e) => e,
            _ => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for FleetError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(FleetError, StatusCode)> = vec![
            (FleetError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (FleetError::Conflict("taken".into()), StatusCode::CONFLICT),
            (FleetError::StorageDisabled, StatusCode::INTERNAL_SERVER_ERROR),
            (
                FleetError::App(AppError::not_found("task 4 not found")),
                StatusCode::NOT_FOUND,
            ),
            (
                FleetError::App(AppError::internal("presign failed")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_messages_survive_conversion() {
        let app: AppError = FleetError::StorageDisabled.into();
        assert_eq!(app.message(), "object storage is not enabled");

        let app: AppError = FleetError::App(AppError::not_found("device 2 not found")).into();
        assert_eq!(app.kind(), ErrorKind::NotFound);
        assert_eq!(app.message(), "device 2 not found");
    }
}
