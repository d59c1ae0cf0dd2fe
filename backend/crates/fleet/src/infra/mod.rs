//! Infrastructure Layer
//!
//! Repository implementations and object storage clients.

pub mod memory;
pub mod postgres;
pub mod storage;

pub use memory::MemoryFleetRepository;
pub use postgres::PgFleetRepository;
pub use storage::{DisabledObjectStorage, S3ObjectStorage};
