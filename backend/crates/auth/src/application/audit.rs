//! Operation Audit Log
//!
//! Writes are best-effort side records: a failed insert is logged and
//! swallowed so it never fails the request that triggered it.

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use kernel::repository::not_found;

use crate::domain::entity::operation::OperationRecord;
use crate::domain::repository::OperationRepository;
use crate::domain::value_object::user_id::OperationId;
use crate::error::{AuthError, AuthResult};

/// Module tag used by records written from this crate
pub const MODULE_AUTH: &str = "auth";

pub struct AuditLog<O>
where
    O: OperationRepository,
{
    operations: Arc<O>,
}

impl<O> AuditLog<O>
where
    O: OperationRepository,
{
    pub fn new(operations: Arc<O>) -> Self {
        Self { operations }
    }

    pub async fn record(&self, record: OperationRecord) {
        let user_name = record.user_name.clone();
        let operation = record.operation;

        if let Err(e) = self.operations.create(record).await {
            tracing::warn!(
                error = %e,
                user_name = %user_name,
                operation = %operation,
                "Failed to record operation"
            );
        }
    }

    pub async fn list(&self, request: PageRequest) -> AuthResult<Page<OperationRecord>> {
        let window = request.resolve();
        let (items, total) = self.operations.find_page(window).await?;
        Ok(Page::new(items, total, window))
    }

    pub async fn get(&self, id: OperationId) -> AuthResult<OperationRecord> {
        self.operations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::from(not_found(id)))
    }
}
