//! Presentation Layer
//!
//! HTTP handlers, DTOs and router. Authentication comes from the `auth` crate.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::FleetAppState;
pub use router::fleet_router;
