//! User Entity
//!
//! Back-office account. The stored password is Credential Codec ciphertext.

use chrono::{DateTime, Utc};
use kernel::id::Id;
use kernel::repository::Entity;

use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Unique among non-deleted users
    pub user_name: UserName,
    /// Credential Codec ciphertext
    pub password: String,
    /// Role code; rows written by older tools may hold an unknown code
    pub role: String,
    pub is_locked: bool,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unlocked user
    pub fn new(user_name: UserName, encrypted_password: String, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            id: Id::unassigned(),
            user_name,
            password: encrypted_password,
            role: role.code().to_string(),
            is_locked: false,
            extra_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::from_code(&self.role)
    }

    pub fn set_password(&mut self, encrypted_password: String) {
        self.password = encrypted_password;
        self.touch();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role.code().to_string();
        self.touch();
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.is_locked = locked;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for User {
    const NAME: &'static str = "user";

    fn id(&self) -> Id<Self> {
        self.id
    }

    fn set_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}
