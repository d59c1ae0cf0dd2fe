//! Value Objects

pub mod device_kind;
pub mod ids;
pub mod task_status;
