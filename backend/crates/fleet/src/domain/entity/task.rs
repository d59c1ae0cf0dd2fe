//! Task Entity
//!
//! A job run against a semantic map. New tasks are always `pending`.

use chrono::{DateTime, Utc};
use kernel::id::Id;
use kernel::repository::Entity;

use crate::domain::value_object::{
    ids::{SemanticMapId, TaskId},
    task_status::TaskStatus,
};

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub semantic_map_id: SemanticMapId,
    pub user_name: String,
    pub task_info: String,
    pub status: TaskStatus,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(semantic_map_id: SemanticMapId, user_name: String, task_info: String) -> Self {
        let now = Utc::now();

        Self {
            id: Id::unassigned(),
            semantic_map_id,
            user_name,
            task_info,
            status: TaskStatus::Pending,
            extra_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Task {
    const NAME: &'static str = "task";

    fn id(&self) -> Id<Self> {
        self.id
    }

    fn set_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}
