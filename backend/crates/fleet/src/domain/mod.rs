//! Domain Layer
//!
//! Entities, value objects, repository and storage traits.

pub mod entity;
pub mod repository;
pub mod storage;
pub mod value_object;

// Re-exports
pub use entity::{device::Device, pcd_file::PcdFile, semantic_map::SemanticMap, task::Task};
pub use repository::{
    DeviceRepository, FleetRepository, PcdFileRepository, SemanticMapRepository, TaskRepository,
};
pub use storage::ObjectStorage;
