use serde::{Deserialize, Serialize};
use std::fmt;

use super::permission::{self, Permission};

/// Closed set of roles; stored as its code in `user_info.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrator,
    Manager,
    Operator,
    User,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Administrator,
        UserRole::Manager,
        UserRole::Operator,
        UserRole::User,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Administrator => "administrator",
            Manager => "manager",
            Operator => "operator",
            User => "user",
        }
    }

    /// Unknown codes are not an error here; callers decide what they mean
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "administrator" => Some(Administrator),
            "manager" => Some(Manager),
            "operator" => Some(Operator),
            "user" => Some(User),
            _ => None,
        }
    }

    #[inline]
    pub const fn permissions(&self) -> &'static [Permission] {
        permission::granted(*self)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("administrator"), Some(UserRole::Administrator));
        assert_eq!(UserRole::from_code("manager"), Some(UserRole::Manager));
        assert_eq!(UserRole::from_code("operator"), Some(UserRole::Operator));
        assert_eq!(UserRole::from_code("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("Administrator"), None);
        assert_eq!(UserRole::from_code("admin"), None);
        assert_eq!(UserRole::from_code(""), None);
    }

    #[test]
    fn test_user_role_display_round_trip() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::from_code(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::Manager).unwrap(),
            "\"manager\""
        );
        let role: UserRole = serde_json::from_str("\"operator\"").unwrap();
        assert_eq!(role, UserRole::Operator);
    }
}
