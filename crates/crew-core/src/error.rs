//! Error types for `crew-core`.
//!
//! Every failure the core can produce is a deterministic logic outcome; none
//! of them are retried. Callers map the variants onto transport status codes.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::leave::LeaveStatus;

/// Failures produced by the access guard and by `authenticate`.
///
/// `InvalidCredentials` covers unknown emails, wrong secrets,
/// forged or expired tokens and tokens whose subject no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("missing credentials")]
  MissingCredentials,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("inactive account")]
  InactiveAccount,

  #[error("insufficient role")]
  InsufficientRole,
}

/// A uniqueness or workflow violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
  #[error("email {0:?} is already registered")]
  DuplicateEmail(String),

  #[error("department {0:?} already exists")]
  DuplicateDepartment(String),

  #[error("attendance for user {user_id} on {date} already exists")]
  DuplicateAttendance { user_id: Uuid, date: NaiveDate },

  #[error("leave request {id} is already {status}")]
  LeaveAlreadyResolved { id: Uuid, status: LeaveStatus },

  #[error("department {id} has {assigned} assigned user(s)")]
  DepartmentInUse { id: Uuid, assigned: u64 },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: String },

  #[error("conflict: {0}")]
  Conflict(#[from] Conflict),

  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    Self::NotFound { entity, id: id.to_string() }
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
