pub mod operation;
pub mod user;
