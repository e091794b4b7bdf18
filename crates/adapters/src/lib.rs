//! gazette adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `gateway`: hosted REST, SQLite and in-memory data store gateways
//! - `generation`: content generation providers (OpenAI, stub)

mod gateway_memory;
mod gateway_sqlite;
mod rest;

pub mod generation;

/// Re-exports for gateway adapters
pub mod gateway {
    pub use crate::gateway_memory::InMemoryGateway;
    pub use crate::gateway_sqlite::SqliteGateway;
    pub use crate::rest::RestGateway;
}
