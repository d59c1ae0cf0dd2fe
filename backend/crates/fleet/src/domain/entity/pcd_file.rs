//! PCD File Entity
//!
//! Metadata of an uploaded point-cloud file. The file itself lives in
//! object storage under `minio_path`.

use chrono::{DateTime, Utc};
use kernel::id::Id;
use kernel::repository::Entity;

use crate::domain::value_object::ids::PcdFileId;

#[derive(Debug, Clone)]
pub struct PcdFile {
    pub id: PcdFileId,
    /// Unique among live files
    pub name: String,
    pub area: String,
    pub path: String,
    pub user_name: String,
    /// Bytes
    pub size: i64,
    pub minio_path: Option<String>,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PcdFile {
    pub fn new(name: String, area: String, path: String, user_name: String, size: i64) -> Self {
        let now = Utc::now();

        Self {
            id: Id::unassigned(),
            name,
            area,
            path,
            user_name,
            size,
            minio_path: None,
            extra_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for PcdFile {
    const NAME: &'static str = "pcd file";

    fn id(&self) -> Id<Self> {
        self.id
    }

    fn set_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}
