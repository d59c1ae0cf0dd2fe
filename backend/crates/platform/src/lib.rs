//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Credential codec (DES-CBC + Base64) for stored passwords
//! - Session tokens (JWT, HMAC family only)
//! - Constant-time comparison and Base64 helpers
//! - Client metadata extraction (IP / User-Agent)

pub mod client;
pub mod credential;
pub mod crypto;
pub mod token;
