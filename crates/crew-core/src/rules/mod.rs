//! Domain invariants enforced on top of an [`HrStore`](crate::store::HrStore).
//!
//! Every operation takes the already-authorized caller. Preconditions are
//! evaluated against storage before the mutation; the store's structural
//! constraints remain the authoritative signal when two callers race past the
//! same pre-check.

pub mod attendance;
pub mod department;
pub mod job_role;
pub mod leave;
pub mod user;

use crate::{
  AuthError, Result,
  user::{Role, User},
};

/// Fail with [`AuthError::InsufficientRole`] unless `caller` holds one of
/// `allowed`.
pub fn require_role(caller: &User, allowed: &[Role]) -> Result<()> {
  if allowed.contains(&caller.role) {
    Ok(())
  } else {
    Err(AuthError::InsufficientRole.into())
  }
}

fn require_text(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(crate::Error::validation(format!("{field} must not be empty")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{Error, user::UserStatus};

  fn user(role: Role) -> User {
    User {
      id:               Uuid::new_v4(),
      email:            "someone@example.com".into(),
      password_hash:    String::new(),
      name:             "Someone".into(),
      role,
      status:           UserStatus::Active,
      phone:            None,
      address:          None,
      department_id:    None,
      position:         None,
      salary:           None,
      dob:              None,
      dob_bs:           None,
      join_date:        None,
      resignation_date: None,
      profile_image:    None,
      created_at:       Utc::now(),
      updated_at:       None,
    }
  }

  #[test]
  fn require_role_accepts_members() {
    assert!(require_role(&user(Role::Hr), Role::PRIVILEGED).is_ok());
    assert!(require_role(&user(Role::TopAdmin), &[Role::TopAdmin]).is_ok());
  }

  #[test]
  fn require_role_rejects_non_members() {
    let err = require_role(&user(Role::Employee), Role::PRIVILEGED).unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::InsufficientRole)));

    let err = require_role(&user(Role::Hr), &[Role::TopAdmin]).unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::InsufficientRole)));
  }

  #[test]
  fn blank_text_is_a_validation_error() {
    assert!(matches!(require_text("name", "   "), Err(Error::Validation(_))));
    assert!(require_text("name", "Ops").is_ok());
  }
}
