//! gazette domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Articles, comments, favorites, users and generation log entries
//! - `ports`: Trait definitions for the gateway and the generation provider
//! - `session`: The explicit session context passed to every operation
//! - `policy`: Role assignment and authorization checks
//! - `text`: Pure text rules (excerpts, heading markers, slugs)
//! - `routes`: Public route table and access guards
//! - `share`: Social share link building
//! - `usecases`: Feed synchronizer, reading list, article page, admin workflow, carousel

pub mod model;
pub mod policy;
pub mod ports;
pub mod routes;
pub mod session;
pub mod share;
pub mod text;
pub mod usecases;

#[cfg(test)]
pub(crate) mod testing;

pub use model::*;
pub use ports::*;
pub use session::Session;
