use kernel::id::Id;

use crate::domain::entity::{
    device::Device, pcd_file::PcdFile, semantic_map::SemanticMap, task::Task,
};

pub type DeviceId = Id<Device>;
pub type PcdFileId = Id<PcdFile>;
pub type SemanticMapId = Id<SemanticMap>;
pub type TaskId = Id<Task>;
