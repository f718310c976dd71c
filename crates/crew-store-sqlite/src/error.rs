//! Error type for `crew-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A constraint violation already translated into its domain meaning.
  #[error(transparent)]
  Core(#[from] crew_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("cannot decode column {column}: {reason}")]
  Decode { column: &'static str, reason: String },
}

impl From<crew_core::Conflict> for Error {
  fn from(conflict: crew_core::Conflict) -> Self { Self::Core(conflict.into()) }
}

impl From<Error> for crew_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(inner) => inner,
      other => crew_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
