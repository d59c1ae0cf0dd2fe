//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::error::app_error::AppResult;
use kernel::repository::Repository;

use crate::domain::entity::{
    device::Device, pcd_file::PcdFile, semantic_map::SemanticMap, task::Task,
};

pub trait DeviceRepository: Repository<Device> {}

impl<T: Repository<Device>> DeviceRepository for T {}

/// PCD file repository trait
///
/// `create` and `update` fail with `Conflict` when another live file has the
/// same name.
#[trait_variant::make(PcdFileRepository: Send)]
pub trait LocalPcdFileRepository: Repository<PcdFile> {
    /// Find a live file by exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<PcdFile>>;
}

pub trait SemanticMapRepository: Repository<SemanticMap> {}

impl<T: Repository<SemanticMap>> SemanticMapRepository for T {}

pub trait TaskRepository: Repository<Task> {}

impl<T: Repository<Task>> TaskRepository for T {}

/// Everything the fleet HTTP layer persists through
pub trait FleetRepository:
    DeviceRepository + PcdFileRepository + SemanticMapRepository + TaskRepository + Sync + 'static
{
}

impl<T> FleetRepository for T where
    T: DeviceRepository + PcdFileRepository + SemanticMapRepository + TaskRepository + Sync + 'static
{
}
