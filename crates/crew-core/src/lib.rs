//! Core types and trait definitions for the Crew HR backend.
//!
//! This crate has no HTTP or database dependencies. It owns
//! the domain model, the error taxonomy, the [`store::HrStore`] abstraction
//! and the invariant rules layered on top of it.

pub mod attendance;
pub mod department;
pub mod error;
pub mod job_role;
pub mod leave;
pub mod rules;
pub mod store;
pub mod user;

pub use error::{AuthError, Conflict, Error, Result};
