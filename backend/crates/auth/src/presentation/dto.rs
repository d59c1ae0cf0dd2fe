//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::patch::Patch;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{operation::OperationRecord, user::User};
use crate::domain::value_object::user_id::{OperationId, UserId};

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

// ============================================================================
// Users
// ============================================================================

/// User as returned by the API; the password never leaves the server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub user_name: String,
    pub role: String,
    /// 0 or 1
    pub is_locked: i16,
    pub extra_info: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.into_inner(),
            role: user.role,
            is_locked: i16::from(user.is_locked),
            extra_info: user.extra_info,
            create_time: user.created_at,
            update_time: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_name: String,
    pub password: String,
    pub role: String,
    pub extra_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_locked: Option<i16>,
    #[serde(default)]
    pub extra_info: Patch<String>,
}

// ============================================================================
// Operations
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub id: OperationId,
    pub user_name: String,
    pub operation: String,
    pub module: String,
    pub target_id: Option<i64>,
    pub target_name: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub extra_info: String,
    pub create_time: DateTime<Utc>,
}

impl From<OperationRecord> for OperationResponse {
    fn from(record: OperationRecord) -> Self {
        Self {
            id: record.id,
            user_name: record.user_name,
            operation: record.operation.code().to_string(),
            module: record.module,
            target_id: record.target_id,
            target_name: record.target_name,
            ip: record.ip,
            user_agent: record.user_agent,
            extra_info: record.extra_info,
            create_time: record.create_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{user_name::UserName, user_role::UserRole};

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new(
            UserName::from_trusted("alice".into()),
            "cipher".into(),
            UserRole::Operator,
        );
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["userName"], "alice");
        assert_eq!(json["isLocked"], 0);
        assert!(json.get("createTime").is_some());
    }

    #[test]
    fn test_update_request_three_way_extra_info() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        assert!(absent.extra_info.is_absent());

        let null: UpdateUserRequest = serde_json::from_str(r#"{"extraInfo":null}"#).unwrap();
        assert!(matches!(null.extra_info, Patch::Null));

        let set: UpdateUserRequest = serde_json::from_str(r#"{"extraInfo":"x"}"#).unwrap();
        assert!(matches!(set.extra_info, Patch::Value(ref v) if v == "x"));
    }
}
