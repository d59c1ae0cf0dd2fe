//! Domain Entities

pub mod device;
pub mod pcd_file;
pub mod semantic_map;
pub mod task;
