//! Super-admin bootstrap
//!
//! Run once at startup: makes sure a `superAdmin` administrator exists.

use platform::credential::CredentialCodec;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_name::UserName, user_password::RawPassword, user_role::UserRole,
};
use crate::error::AuthResult;

pub const SUPER_ADMIN_NAME: &str = "superAdmin";
const SUPER_ADMIN_PASSWORD: &str = "superAdmin";

/// Create the super admin if no live user has its name
///
/// Returns the created user, or `None` when it already existed.
pub async fn ensure_super_admin<U>(users: &U, codec: &CredentialCodec) -> AuthResult<Option<User>>
where
    U: UserRepository,
{
    if users.find_by_user_name(SUPER_ADMIN_NAME).await?.is_some() {
        tracing::debug!("Super admin already present");
        return Ok(None);
    }

    let password = RawPassword::new(SUPER_ADMIN_PASSWORD.to_string())?.encrypt(codec)?;
    let user = User::new(
        UserName::from_trusted(SUPER_ADMIN_NAME.to_string()),
        password,
        UserRole::Administrator,
    );
    let user = users.create(user).await?;

    tracing::info!(user_id = %user.id, user_name = SUPER_ADMIN_NAME, "Super admin created");

    Ok(Some(user))
}
