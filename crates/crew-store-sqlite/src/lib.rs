//! SQLite backend for the Crew HR store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Uniqueness and referential invariants
//! are enforced by the schema itself; constraint failures are translated into
//! the matching [`crew_core::Error`] variants.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
