//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Random tokens and constant-time comparison
//! - Password hashing (Argon2id)
//! - Cookie building and parsing
//! - Client address resolution for audit logs

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
