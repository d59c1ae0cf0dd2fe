//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed integer IDs for persisted entities
//! - The response envelope shared by every endpoint
//! - Pagination policy and the generic repository contract
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod pagination;
pub mod patch;
pub mod repository;
pub mod response;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
