//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::error::app_error::AppResult;
use kernel::repository::Repository;

use crate::domain::entity::{operation::OperationRecord, user::User};

/// User repository trait
///
/// `create` fails with `Conflict` when a live user already has the name.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository: Repository<User> {
    /// Find a live user by exact name
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<User>>;
}

/// Operation audit log storage
pub trait OperationRepository: Repository<OperationRecord> {}

impl<T: Repository<OperationRecord>> OperationRepository for T {}
