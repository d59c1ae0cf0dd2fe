//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::credential::CredentialCodec;
use platform::token::TokenService;

use crate::error::{AuthError, AuthResult};

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Credential Codec key, exactly 8 bytes
    pub des_key: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expire_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            des_key: String::new(),
            jwt_secret: String::new(),
            jwt_expire_hours: 24,
        }
    }
}

impl AuthConfig {
    /// Fixed, well-known secrets. Never use outside local development and tests.
    pub fn development() -> Self {
        Self {
            des_key: "12345678".to_string(),
            jwt_secret: "development-jwt-secret".to_string(),
            ..Default::default()
        }
    }

    pub fn token_service(&self) -> TokenService {
        TokenService::new(&self.jwt_secret, self.jwt_expire_hours)
    }

    /// Fails when the key is not 8 bytes
    pub fn credential_codec(&self) -> AuthResult<CredentialCodec> {
        CredentialCodec::new(self.des_key.as_bytes()).map_err(AuthError::Codec)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("des_key", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expire_hours", &self.jwt_expire_hours)
            .finish()
    }
}
