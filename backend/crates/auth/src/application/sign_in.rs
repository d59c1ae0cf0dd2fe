//! Sign In Use Case
//!
//! Verifies a user name / password pair and issues a session token.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::credential::CredentialCodec;
use platform::token::TokenService;

use crate::application::audit::{AuditLog, MODULE_AUTH};
use crate::domain::entity::{operation::OperationRecord, user::User};
use crate::domain::repository::{OperationRepository, UserRepository};
use crate::domain::value_object::{operation_kind::OperationKind, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<U, O>
where
    U: UserRepository,
    O: OperationRepository,
{
    users: Arc<U>,
    audit: AuditLog<O>,
    codec: Arc<CredentialCodec>,
    tokens: Arc<TokenService>,
}

impl<U, O> SignInUseCase<U, O>
where
    U: UserRepository,
    O: OperationRepository,
{
    pub fn new(
        users: Arc<U>,
        operations: Arc<O>,
        codec: Arc<CredentialCodec>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            audit: AuditLog::new(operations),
            codec,
            tokens,
        }
    }

    pub async fn execute(&self, input: SignInInput, client: &ClientInfo) -> AuthResult<SignInOutput> {
        let user = self
            .users
            .find_by_user_name(&input.user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Locked accounts are refused before the password is looked at
        if user.is_locked {
            return Err(AuthError::AccountLocked);
        }

        let attempt = RawPassword::for_login(input.password);
        if !attempt.matches(&user.password, &self.codec)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id.value(), user.user_name.as_str(), &user.role)
            .map_err(AuthError::TokenIssue)?;

        self.audit
            .record(
                OperationRecord::new(user.user_name.as_str(), OperationKind::Login, MODULE_AUTH)
                    .with_target(user.id.value(), user.user_name.as_str())
                    .with_client(client),
            )
            .await;

        tracing::info!(
            user_id = %user.id,
            user_name = %user.user_name,
            role = %user.role,
            "User logged in"
        );

        Ok(SignInOutput { token, user })
    }
}
