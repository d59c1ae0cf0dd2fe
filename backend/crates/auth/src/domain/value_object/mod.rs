//! Value Object Module

pub mod operation_kind;
pub mod permission;
pub mod user_id;
pub mod user_name;
pub mod user_password;
pub mod user_role;
