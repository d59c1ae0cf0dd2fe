//! Infrastructure Layer
//!
//! Database implementations and an in-process twin used by tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryAuthRepository;
pub use postgres::PgAuthRepository;
