//! Infrastructure Layer
//!
//! Content store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryWorksRepository;
pub use postgres::PgWorksRepository;
