//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::credential::CodecError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password (deliberately indistinguishable)
    #[error("Invalid user name or password")]
    InvalidCredentials,

    #[error("User account is locked")]
    AccountLocked,

    /// No `Authorization` header
    #[error("Missing authorization header")]
    MissingToken,

    /// Header present but not `Bearer <token>`
    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedAuthorization,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    /// Authenticated but the role lacks every required permission
    #[error("Permission denied")]
    Forbidden,

    /// Malformed request field
    #[error("{0}")]
    Validation(String),

    /// Stored credential could not be decrypted during login
    #[error("Login failed")]
    CredentialDecode(#[source] CodecError),

    /// Codec misconfiguration or encryption failure
    #[error("Credential codec error")]
    Codec(#[source] CodecError),

    #[error("Failed to issue token")]
    TokenIssue(#[source] TokenError),

    /// Repository failure; keeps the original kind (NotFound, Conflict, ...)
    #[error(transparent)]
    Repository(#[from] AppError),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::AccountLocked
            | AuthError::MissingToken
            | AuthError::MalformedAuthorization
            | AuthError::TokenExpired
            | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::CredentialDecode(_) | AuthError::Codec(_) | AuthError::TokenIssue(_) => {
                ErrorKind::InternalServerError
            }
            AuthError::Repository(e) => e.kind(),
        }
    }

    /// Log client-side failures; server-side ones are logged by `AppError`
    fn log(&self) {
        match self {
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::Forbidden => {
                tracing::warn!("Permission denied");
            }
            AuthError::TokenExpired | AuthError::TokenInvalid => {
                tracing::debug!(error = %self, "Token rejected");
            }
            _ => {}
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let (kind, message) = (err.kind(), err.to_string());
        match err {
            AuthError::Repository(e) => e,
            AuthError::CredentialDecode(source) | AuthError::Codec(source) => {
                AppError::new(kind, message).with_source(source)
            }
            AuthError::TokenIssue(source) => AppError::new(kind, message).with_source(source),
            _ => AppError::new(kind, message),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
            TokenError::Signing(_) => AuthError::TokenIssue(err),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
