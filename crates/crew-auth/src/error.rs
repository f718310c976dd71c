//! Error type for `crew-auth` setup and signing failures.
//!
//! Rejections of presented credentials are not errors of this crate; they
//! surface as [`crew_core::AuthError`] through the guard.

use thiserror::Error;

use crate::token::MIN_SECRET_LEN;

#[derive(Debug, Error)]
pub enum Error {
  #[error("token signing secret is {len} bytes; at least {MIN_SECRET_LEN} are required")]
  WeakSecret { len: usize },

  #[error("token encoding failed: {0}")]
  Encoding(#[from] jsonwebtoken::errors::Error),

  #[error("password hashing failed: {0}")]
  Hash(String),
}

impl From<Error> for crew_core::Error {
  fn from(err: Error) -> Self { crew_core::Error::Store(Box::new(err)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
