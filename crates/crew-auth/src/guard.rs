//! The access guard.
//!
//! Every authenticated request walks the same pipeline:
//! bearer extraction, token validation, identity load, liveness check, then
//! an optional role check. Nothing is cached; the stored user decides, so a
//! deactivation or role change takes effect on the very next request.

use chrono::{DateTime, Utc};
use crew_core::{
  AuthError, Result, rules,
  store::{HrStore, StoreResultExt},
  user::{Role, User, normalize_email},
};

use crate::{BearerToken, TokenCodec, password};

/// Extract the credential from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively. Anything else, including an
/// empty token, yields `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
  let (scheme, token) = authorization?.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  (!token.is_empty()).then_some(token)
}

/// Resolve the caller behind `authorization`.
///
/// `required` of `None` admits any active user.
pub async fn authorize<S: HrStore>(
  codec: &TokenCodec,
  store: &S,
  authorization: Option<&str>,
  required: Option<&[Role]>,
  now: DateTime<Utc>,
) -> Result<User> {
  let token =
    bearer_token(authorization).ok_or(AuthError::MissingCredentials)?;

  let claims = codec.validate(token, now).map_err(|e| {
    tracing::debug!(reason = %e, "bearer token rejected");
    AuthError::InvalidCredentials
  })?;

  let user = store
    .get_user(claims.sub)
    .await
    .into_core()?
    .ok_or_else(|| {
      tracing::warn!(user_id = %claims.sub, "token subject no longer exists");
      AuthError::InvalidCredentials
    })?;

  if !user.status.is_active() {
    tracing::debug!(user_id = %user.id, status = user.status.as_str(), "inactive account");
    return Err(AuthError::InactiveAccount.into());
  }
  if let Some(roles) = required {
    rules::require_role(&user, roles)?;
  }
  Ok(user)
}

/// Check an email and password pair.
///
/// An unknown email and a wrong password fail identically, in both error and
/// cost.
pub async fn authenticate<S: HrStore>(
  store: &S,
  email: &str,
  secret: &str,
) -> Result<User> {
  let Some(user) = store
    .find_user_by_email(&normalize_email(email))
    .await
    .into_core()?
  else {
    password::verify_dummy(secret);
    tracing::warn!("login failed");
    return Err(AuthError::InvalidCredentials.into());
  };

  if !password::verify(secret, &user.password_hash) {
    tracing::warn!(user_id = %user.id, "login failed");
    return Err(AuthError::InvalidCredentials.into());
  }
  Ok(user)
}

/// Authenticate, refuse non-active accounts, and issue a token.
pub async fn login<S: HrStore>(
  codec: &TokenCodec,
  store: &S,
  email: &str,
  secret: &str,
  now: DateTime<Utc>,
) -> Result<(User, BearerToken)> {
  let user = authenticate(store, email, secret).await?;
  if !user.status.is_active() {
    return Err(AuthError::InactiveAccount.into());
  }
  let token = codec.issue(user.id, user.role, now)?;
  tracing::info!(user_id = %user.id, role = %user.role, "login succeeded");
  Ok((user, token))
}
