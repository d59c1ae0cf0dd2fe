//! In-process auth repository
//!
//! Same contract as [`PgAuthRepository`](super::postgres::PgAuthRepository),
//! including the live-name uniqueness rule.

use kernel::error::app_error::AppResult;
use kernel::pagination::PageWindow;
use kernel::repository::{InMemoryRepository, Repository};

use crate::domain::entity::{operation::OperationRecord, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::{OperationId, UserId};

#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    users: InMemoryRepository<User>,
    operations: InMemoryRepository<OperationRecord>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository<User> for MemoryAuthRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.users
            .create_unless(user, |live, new| live.user_name == new.user_name)
            .await
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.users.update(user).await
    }

    async fn delete(&self, id: UserId) -> AppResult<()> {
        self.users.delete(id).await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<User>, i64)> {
        self.users.find_page(window).await
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .find_first(|user| user.user_name.as_str() == user_name)
            .await)
    }
}

impl Repository<OperationRecord> for MemoryAuthRepository {
    async fn create(&self, record: OperationRecord) -> AppResult<OperationRecord> {
        self.operations.create(record).await
    }

    async fn update(&self, record: &OperationRecord) -> AppResult<()> {
        self.operations.update(record).await
    }

    async fn delete(&self, id: OperationId) -> AppResult<()> {
        self.operations.delete(id).await
    }

    async fn find_by_id(&self, id: OperationId) -> AppResult<Option<OperationRecord>> {
        self.operations.find_by_id(id).await
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<OperationRecord>, i64)> {
        self.operations.find_page(window).await
    }
}
