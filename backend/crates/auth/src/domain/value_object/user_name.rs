//! User Name Value Object
//!
//! ログインと表示に使う一意なハンドル。
//! 前後の空白を除いた文字数が 3〜50 であること。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Validate user input
    pub fn new(raw: &str) -> AuthResult<Self> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&len) {
            return Err(AuthError::Validation(format!(
                "userName must be {}-{} characters",
                USER_NAME_MIN_LENGTH, USER_NAME_MAX_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a value read back from storage
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for UserName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(UserName::new("ab").is_err());
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new(&"x".repeat(50)).is_ok());
        assert!(UserName::new(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_trims_whitespace() {
        let name = UserName::new("  alice  ").unwrap();
        assert_eq!(name.as_str(), "alice");
        assert!(UserName::new("   ab   ").is_err());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(UserName::new("山田太").is_ok());
    }
}
