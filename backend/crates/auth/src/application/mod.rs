//! Application Layer
//!
//! Use cases and application services.

pub mod audit;
pub mod bootstrap;
pub mod config;
pub mod manage_user;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use audit::AuditLog;
pub use bootstrap::{SUPER_ADMIN_NAME, ensure_super_admin};
pub use config::AuthConfig;
pub use manage_user::{CreateUserInput, UpdateUserInput, UserService};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
