//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, roles, the permission catalog, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-process repositories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - User name + password login issuing stateless JWT session tokens
//! - Role based permissions (administrator, manager, operator, user)
//! - Administrator user management with soft delete
//! - Operation audit log (login / logout records)
//!
//! ## Security Model
//! - Stored passwords are DES-CBC ciphertext (reversible, kept for
//!   compatibility with existing rows)
//! - Locked accounts are refused before the password is checked
//! - Permissions are derived from the role on every request, never stored

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{SUPER_ADMIN_NAME, ensure_super_admin};
pub use domain::value_object::permission::Permission;
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryAuthRepository, PgAuthRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{ClientMeta, Identity, gate, require_auth};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
