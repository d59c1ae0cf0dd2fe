//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod device;
pub mod pcd_file;
pub(crate) mod rules;
pub mod semantic_map;
pub mod task;
pub mod upload_token;

// Re-exports
pub use config::StorageConfig;
pub use device::{CreateDeviceInput, DeviceService, UpdateDeviceInput};
pub use pcd_file::{CreatePcdFileInput, PcdFileService, UpdatePcdFileInput};
pub use semantic_map::{CreateSemanticMapInput, SemanticMapService, UpdateSemanticMapInput};
pub use task::{CreateTaskInput, TaskService, UpdateTaskInput};
pub use upload_token::{UploadToken, UploadTokenInput, UploadTokenIssuer};
