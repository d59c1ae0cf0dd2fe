//! Sign Out Use Case
//!
//! Sessions are stateless, so there is nothing to invalidate: the client
//! discards its token. The only effect is the audit record.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::audit::{AuditLog, MODULE_AUTH};
use crate::domain::entity::operation::OperationRecord;
use crate::domain::repository::OperationRepository;
use crate::domain::value_object::operation_kind::OperationKind;

/// Sign out use case
pub struct SignOutUseCase<O>
where
    O: OperationRepository,
{
    audit: AuditLog<O>,
}

impl<O> SignOutUseCase<O>
where
    O: OperationRepository,
{
    pub fn new(operations: Arc<O>) -> Self {
        Self {
            audit: AuditLog::new(operations),
        }
    }

    pub async fn execute(&self, user_id: i64, user_name: &str, client: &ClientInfo) {
        self.audit
            .record(
                OperationRecord::new(user_name, OperationKind::Logout, MODULE_AUTH)
                    .with_target(user_id, user_name)
                    .with_client(client),
            )
            .await;

        tracing::info!(user_id = user_id, user_name = %user_name, "User logged out");
    }
}
