//! Fleet Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Devices, PCD files, semantic maps, tasks; repository and storage traits
//! - `application/` - Services, upload tokens, storage configuration
//! - `infra/` - PostgreSQL and in-process repositories, S3 / MinIO client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Device registry (new devices start `offline`)
//! - Point-cloud (PCD) file catalog with unique names and pre-signed upload URLs
//! - Semantic maps over PCD files, tasks over semantic maps (new tasks start `pending`)
//!
//! Every route sits behind the `auth` token check and a per-route permission gate.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::StorageConfig;
pub use domain::repository::FleetRepository;
pub use domain::storage::ObjectStorage;
pub use error::{FleetError, FleetResult};
pub use infra::{DisabledObjectStorage, MemoryFleetRepository, PgFleetRepository, S3ObjectStorage};
pub use presentation::handlers::FleetAppState;
pub use presentation::router::fleet_router;

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
