//! Password hashing and verification.
//!
//! Digests are argon2id PHC strings (`$argon2id$v=19$…`) with a fresh random
//! salt per hash. Neither secrets nor digests are ever logged.

use std::sync::OnceLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Shortest password accepted at registration or account creation.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn check_strength(secret: &str) -> crew_core::Result<()> {
  if secret.chars().count() < MIN_PASSWORD_LEN {
    return Err(crew_core::Error::validation(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

pub fn hash(secret: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(secret.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// Check `secret` against a stored digest. An unparsable digest never
/// verifies.
pub fn verify(secret: &str, digest: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(digest) else {
    return false;
  };
  Argon2::default()
    .verify_password(secret.as_bytes(), &parsed)
    .is_ok()
}

/// Spend one verification against a fixed digest so that a login for an
/// unknown email costs as much as one with a wrong password.
pub fn verify_dummy(secret: &str) {
  static DUMMY: OnceLock<Option<String>> = OnceLock::new();
  if let Some(digest) = DUMMY.get_or_init(|| hash("crew-dummy-credential").ok()) {
    let _ = verify(secret, digest);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_secret_hashes_differently() {
    let a = hash("hunter22").unwrap();
    let b = hash("hunter22").unwrap();
    assert_ne!(a, b);
    assert!(a.starts_with("$argon2id$"));
    assert!(verify("hunter22", &a));
    assert!(verify("hunter22", &b));
  }

  #[test]
  fn wrong_secret_does_not_verify() {
    let digest = hash("correct horse").unwrap();
    assert!(!verify("battery staple", &digest));
  }

  #[test]
  fn garbage_digest_does_not_verify() {
    assert!(!verify("anything", "not-a-phc-string"));
    assert!(!verify("anything", ""));
  }

  #[test]
  fn short_passwords_are_rejected() {
    assert!(check_strength("12345").is_err());
    assert!(check_strength("123456").is_ok());
  }
}
