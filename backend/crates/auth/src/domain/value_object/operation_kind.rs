use serde::{Deserialize, Serialize};
use std::fmt;

/// What an audited user action did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
    Query,
    Login,
    Logout,
}

impl OperationKind {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use OperationKind::*;
        match self {
            Create => "create",
            Update => "update",
            Delete => "delete",
            Query => "query",
            Login => "login",
            Logout => "logout",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use OperationKind::*;
        match code {
            "create" => Some(Create),
            "update" => Some(Update),
            "delete" => Some(Delete),
            "query" => Some(Query),
            "login" => Some(Login),
            "logout" => Some(Logout),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for kind in [
            OperationKind::Create,
            OperationKind::Update,
            OperationKind::Delete,
            OperationKind::Query,
            OperationKind::Login,
            OperationKind::Logout,
        ] {
            assert_eq!(OperationKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(OperationKind::from_code("drop"), None);
    }
}
