//! In-process fleet repository
//!
//! Same contract as [`PgFleetRepository`](super::postgres::PgFleetRepository),
//! including the live PCD file name uniqueness rule.

use kernel::error::app_error::AppResult;
use kernel::pagination::PageWindow;
use kernel::repository::{InMemoryRepository, Repository};

use crate::domain::entity::{
    device::Device, pcd_file::PcdFile, semantic_map::SemanticMap, task::Task,
};
use crate::domain::repository::PcdFileRepository;
use crate::domain::value_object::ids::{DeviceId, PcdFileId, SemanticMapId, TaskId};

#[derive(Clone, Default)]
pub struct MemoryFleetRepository {
    devices: InMemoryRepository<Device>,
    pcd_files: InMemoryRepository<PcdFile>,
    semantic_maps: InMemoryRepository<SemanticMap>,
    tasks: InMemoryRepository<Task>,
}

impl MemoryFleetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository<Device> for MemoryFleetRepository {
    async fn create(&self, device: Device) -> AppResult<Device> {
        self.devices.create(device).await
    }

    async fn update(&self, device: &Device) -> AppResult<()> {
        self.devices.update(device).await
    }

    async fn delete(&self, id: DeviceId) -> AppResult<()> {
        self.devices.delete(id).await
    }

    async fn find_by_id(&self, id: DeviceId) -> AppResult<Option<Device>> {
        self.devices.find_by_id(id).await
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<Device>, i64)> {
        self.devices.find_page(window).await
    }
}

impl Repository<PcdFile> for MemoryFleetRepository {
    async fn create(&self, file: PcdFile) -> AppResult<PcdFile> {
        self.pcd_files
            .create_unless(file, |live, new| live.name == new.name)
            .await
    }

    async fn update(&self, file: &PcdFile) -> AppResult<()> {
        self.pcd_files.update(file).await
    }

    async fn delete(&self, id: PcdFileId) -> AppResult<()> {
        self.pcd_files.delete(id).await
    }

    async fn find_by_id(&self, id: PcdFileId) -> AppResult<Option<PcdFile>> {
        self.pcd_files.find_by_id(id).await
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<PcdFile>, i64)> {
        self.pcd_files.find_page(window).await
    }
}

impl PcdFileRepository for MemoryFleetRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<PcdFile>> {
        Ok(self.pcd_files.find_first(|file| file.name == name).await)
    }
}

impl Repository<SemanticMap> for MemoryFleetRepository {
    async fn create(&self, map: SemanticMap) -> AppResult<SemanticMap> {
        self.semantic_maps.create(map).await
    }

    async fn update(&self, map: &SemanticMap) -> AppResult<()> {
        self.semantic_maps.update(map).await
    }

    async fn delete(&self, id: SemanticMapId) -> AppResult<()> {
        self.semantic_maps.delete(id).await
    }

    async fn find_by_id(&self, id: SemanticMapId) -> AppResult<Option<SemanticMap>> {
        self.semantic_maps.find_by_id(id).await
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<SemanticMap>, i64)> {
        self.semantic_maps.find_page(window).await
    }
}

impl Repository<Task> for MemoryFleetRepository {
    async fn create(&self, task: Task) -> AppResult<Task> {
        self.tasks.create(task).await
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        self.tasks.update(task).await
    }

    async fn delete(&self, id: TaskId) -> AppResult<()> {
        self.tasks.delete(id).await
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        self.tasks.find_by_id(id).await
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<Task>, i64)> {
        self.tasks.find_page(window).await
    }
}
