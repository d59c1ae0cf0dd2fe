//! User management
//!
//! Administrator CRUD over accounts. Passwords are re-encrypted with the
//! Credential Codec whenever they are set.

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use kernel::patch::Patch;
use kernel::repository::not_found;
use platform::credential::CredentialCodec;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::RawPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct CreateUserInput {
    pub user_name: String,
    pub password: String,
    pub role: String,
    pub extra_info: Option<String>,
}

/// Absent fields are left unchanged
#[derive(Default)]
pub struct UpdateUserInput {
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_locked: Option<i16>,
    pub extra_info: Patch<String>,
}

pub struct UserService<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    codec: Arc<CredentialCodec>,
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, codec: Arc<CredentialCodec>) -> Self {
        Self { users, codec }
    }

    pub async fn create(&self, input: CreateUserInput) -> AuthResult<User> {
        let user_name = UserName::new(&input.user_name)?;
        let role = parse_role(&input.role)?;
        let password = RawPassword::new(input.password)?.encrypt(&self.codec)?;

        let mut user = User::new(user_name, password, role);
        user.extra_info = input.extra_info;

        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, user_name = %user.user_name, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn update(&self, id: UserId, input: UpdateUserInput) -> AuthResult<()> {
        let mut user = self.get(id).await?;

        if let Some(password) = input.password {
            let encrypted = RawPassword::new(password)?.encrypt(&self.codec)?;
            user.set_password(encrypted);
        }
        if let Some(role) = input.role {
            user.set_role(parse_role(&role)?);
        }
        if let Some(locked) = input.is_locked {
            user.set_locked(parse_locked(locked)?);
        }
        if !input.extra_info.is_absent() {
            input.extra_info.apply_to(&mut user.extra_info);
            user.touch();
        }

        self.users.update(&user).await?;
        tracing::info!(user_id = %id, "User updated");
        Ok(())
    }

    pub async fn delete(&self, id: UserId) -> AuthResult<()> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn get(&self, id: UserId) -> AuthResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::from(not_found(id)))
    }

    pub async fn list(&self, request: PageRequest) -> AuthResult<Page<User>> {
        let window = request.resolve();
        let (items, total) = self.users.find_page(window).await?;
        Ok(Page::new(items, total, window))
    }
}

fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::from_code(code).ok_or_else(|| {
        AuthError::Validation(
            "role must be one of administrator, manager, operator, user".to_string(),
        )
    })
}

fn parse_locked(value: i16) -> AuthResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(AuthError::Validation("isLocked must be 0 or 1".to_string())),
    }
}
