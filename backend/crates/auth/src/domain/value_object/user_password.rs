//! User Password Value Object
//!
//! Plaintext password as received from a client. Stored passwords are the
//! Credential Codec ciphertext of this value, never the value itself.

use platform::credential::CredentialCodec;
use platform::crypto::constant_time_eq;
use std::fmt;

use crate::error::{AuthError, AuthResult};

pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Raw password from user input
pub struct RawPassword(String);

impl RawPassword {
    /// Validate a new password (create user / change password)
    pub fn new(raw: String) -> AuthResult<Self> {
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                PASSWORD_MIN_LENGTH
            )));
        }
        Ok(Self(raw))
    }

    /// Accept a login attempt as-is; policy only applies when setting
    pub fn for_login(raw: String) -> Self {
        Self(raw)
    }

    pub fn encrypt(&self, codec: &CredentialCodec) -> AuthResult<String> {
        codec.encrypt(&self.0).map_err(AuthError::Codec)
    }

    /// Compare against a stored ciphertext in constant time
    pub fn matches(&self, stored: &str, codec: &CredentialCodec) -> AuthResult<bool> {
        let plain = codec
            .decrypt_bytes(stored)
            .map_err(AuthError::CredentialDecode)?;
        Ok(constant_time_eq(&plain, self.0.as_bytes()))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> CredentialCodec {
        CredentialCodec::new(b"12345678").unwrap()
    }

    #[test]
    fn test_min_length() {
        assert!(RawPassword::new("12345".into()).is_err());
        assert!(RawPassword::new("123456".into()).is_ok());
    }

    #[test]
    fn test_encrypt_then_match() {
        let password = RawPassword::new("superAdmin".into()).unwrap();
        let stored = password.encrypt(&codec()).unwrap();
        assert_eq!(stored, "O89U9vza98OriIvMaQZdrg==");

        assert!(password.matches(&stored, &codec()).unwrap());
        assert!(!RawPassword::for_login("superadmin".into()).matches(&stored, &codec()).unwrap());
    }

    #[test]
    fn test_corrupt_stored_value() {
        let attempt = RawPassword::for_login("whatever".into());
        assert!(matches!(
            attempt.matches("***", &codec()),
            Err(AuthError::CredentialDecode(_))
        ));
    }

    #[test]
    fn test_debug_redacts() {
        let password = RawPassword::new("hunter22".into()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));
    }
}
