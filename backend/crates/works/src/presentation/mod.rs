//! Presentation Layer
//!
//! HTTP handlers, DTOs and the router for the content API.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::WorksAppState;
pub use router::works_routes;
