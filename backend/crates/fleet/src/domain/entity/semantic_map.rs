use chrono::{DateTime, Utc};
use kernel::id::Id;
use kernel::repository::Entity;

use crate::domain::value_object::ids::{PcdFileId, SemanticMapId};

/// Semantic annotation layered over one PCD file
#[derive(Debug, Clone)]
pub struct SemanticMap {
    pub id: SemanticMapId,
    pub pcd_file_id: PcdFileId,
    pub user_name: String,
    pub semantic_info: String,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SemanticMap {
    pub fn new(pcd_file_id: PcdFileId, user_name: String, semantic_info: String) -> Self {
        let now = Utc::now();

        Self {
            id: Id::unassigned(),
            pcd_file_id,
            user_name,
            semantic_info,
            extra_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for SemanticMap {
    const NAME: &'static str = "semantic map";

    fn id(&self) -> Id<Self> {
        self.id
    }

    fn set_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}
