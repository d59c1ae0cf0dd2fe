//! Operation Record Entity
//!
//! Append-only audit entry. Listed newest first.

use chrono::{DateTime, Utc};
use kernel::id::Id;
use kernel::repository::{Entity, ListOrder};
use platform::client::ClientInfo;

use crate::domain::value_object::{operation_kind::OperationKind, user_id::OperationId};

#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub id: OperationId,
    pub user_name: String,
    pub operation: OperationKind,
    /// Functional area, e.g. `auth`, `device`
    pub module: String,
    pub target_id: Option<i64>,
    pub target_name: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// Free-form JSON payload (text)
    pub extra_info: String,
    pub create_time: DateTime<Utc>,
}

impl OperationRecord {
    pub fn new(user_name: impl Into<String>, operation: OperationKind, module: &str) -> Self {
        Self {
            id: Id::unassigned(),
            user_name: user_name.into(),
            operation,
            module: module.to_string(),
            target_id: None,
            target_name: None,
            ip: None,
            user_agent: None,
            extra_info: "{}".to_string(),
            create_time: Utc::now(),
        }
    }

    pub fn with_target(mut self, target_id: i64, target_name: impl Into<String>) -> Self {
        self.target_id = Some(target_id);
        self.target_name = Some(target_name.into());
        self
    }

    pub fn with_client(mut self, client: &ClientInfo) -> Self {
        self.ip = client.ip_string();
        self.user_agent = client.user_agent.clone();
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra_info = extra.to_string();
        self
    }
}

impl Entity for OperationRecord {
    const NAME: &'static str = "operation";
    const LIST_ORDER: ListOrder = ListOrder::NewestFirst;

    fn id(&self) -> Id<Self> {
        self.id
    }

    fn set_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}
