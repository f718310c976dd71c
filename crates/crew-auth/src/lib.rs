//! Identity and access control for Crew.
//!
//! Three pieces, leaves first:
//!
//! - [`password`]: argon2id hashing and constant-time verification.
//! - [`token`]: stateless HS256 bearer tokens with a fixed TTL.
//! - [`guard`]: the pipeline that turns an `Authorization` header into an
//!   active, role-checked [`crew_core::user::User`].

pub mod config;
pub mod error;
pub mod guard;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use error::{Error, Result};
pub use token::{BearerToken, Claims, TokenCodec, TokenError};
