use kernel::id::Id;

use crate::domain::entity::operation::OperationRecord;
use crate::domain::entity::user::User;

pub type UserId = Id<User>;
pub type OperationId = Id<OperationRecord>;
