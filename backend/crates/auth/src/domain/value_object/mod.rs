//! Value Object Module

pub mod login_lockout;
pub mod user_id;
pub mod user_name;
pub mod user_password;
pub mod user_role;
