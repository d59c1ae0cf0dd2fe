//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{ClientMeta, Identity, PermissionGuard, gate, require_auth, require_permission};
pub use router::auth_router;
