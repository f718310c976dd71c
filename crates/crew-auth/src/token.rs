//! Stateless bearer tokens.
//!
//! A token is an HS256 JWT carrying the subject's id and role, issued-at and
//! expiry (seconds since the epoch). Expiry is checked here rather than by
//! `jsonwebtoken` so the boundary is exact: a token is rejected from the
//! instant `now >= exp`, with no leeway.

use chrono::{DateTime, SubsecRound, Utc};
use crew_core::user::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{AuthConfig, Error, Result};

/// Shortest signing secret accepted at startup.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub:  Uuid,
  pub role: Role,
  pub iat:  i64,
  pub exp:  i64,
}

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
  #[error("token is malformed or its signature does not verify")]
  Malformed,

  #[error("token has expired")]
  Expired,
}

/// An encoded token, ready to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }
}

pub struct TokenCodec {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl_secs:   i64,
}

impl TokenCodec {
  /// Build a codec, refusing secrets shorter than [`MIN_SECRET_LEN`] bytes.
  pub fn new(config: &AuthConfig) -> Result<Self> {
    let secret = config.jwt_secret.as_bytes();
    if secret.len() < MIN_SECRET_LEN {
      return Err(Error::WeakSecret { len: secret.len() });
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    Ok(Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
      ttl_secs: config.token_ttl.num_seconds(),
    })
  }

  pub fn ttl_secs(&self) -> i64 { self.ttl_secs }

  /// Sign a token for `user_id` that expires `ttl` after issuance.
  ///
  /// Issuance is `now` truncated to the whole second, the same instant the
  /// `iat` claim records. The token is valid on `[iat, iat + ttl)`.
  pub fn issue(
    &self,
    user_id: Uuid,
    role: Role,
    now: DateTime<Utc>,
  ) -> Result<BearerToken> {
    let iat = now.trunc_subsecs(0).timestamp();
    let claims = Claims { sub: user_id, role, iat, exp: iat + self.ttl_secs };
    let token =
      jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
    Ok(BearerToken(token))
  }

  /// Verify the signature, then the expiry against `now`.
  pub fn validate(
    &self,
    token: &str,
    now: DateTime<Utc>,
  ) -> Result<Claims, TokenError> {
    let data =
      jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
        .map_err(|_| TokenError::Malformed)?;
    if now.timestamp() >= data.claims.exp {
      return Err(TokenError::Expired);
    }
    Ok(data.claims)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  const SECRET: &str = "0123456789abcdef0123456789abcdef";

  fn codec(secret: &str, ttl_minutes: i64) -> TokenCodec {
    TokenCodec::new(&AuthConfig::new(secret, ttl_minutes)).unwrap()
  }

  #[test]
  fn short_secret_is_refused() {
    let err = TokenCodec::new(&AuthConfig::new("too-short", 30)).err();
    assert!(matches!(err, Some(Error::WeakSecret { len: 9 })));
  }

  #[test]
  fn issued_token_carries_subject_and_role() {
    let codec = codec(SECRET, 30);
    let now = Utc::now();
    let id = Uuid::new_v4();

    let token = codec.issue(id, Role::Hr, now).unwrap();
    let claims = codec.validate(token.as_str(), now).unwrap();
    assert_eq!(claims.sub, id);
    assert_eq!(claims.role, Role::Hr);
    assert_eq!(claims.exp - claims.iat, 30 * 60);
  }

  #[test]
  fn token_expires_exactly_at_ttl() {
    let codec = codec(SECRET, 30);
    let now = Utc::now();
    let token = codec.issue(Uuid::new_v4(), Role::Employee, now).unwrap();

    let just_before = now + Duration::minutes(30) - Duration::seconds(1);
    assert!(codec.validate(token.as_str(), just_before).is_ok());

    let at_boundary = now + Duration::minutes(30);
    assert_eq!(
      codec.validate(token.as_str(), at_boundary),
      Err(TokenError::Expired)
    );
  }

  #[test]
  fn window_is_measured_from_the_signing_second() {
    let codec = codec(SECRET, 30);
    let now = DateTime::from_timestamp_millis(1_700_000_000_900).unwrap();
    let token = codec.issue(Uuid::new_v4(), Role::Employee, now).unwrap();

    let claims = codec.validate(token.as_str(), now).unwrap();
    let issued = now.trunc_subsecs(0);
    assert_eq!(claims.iat, issued.timestamp());

    let ttl = Duration::minutes(30);
    let last_moment = issued + ttl - Duration::milliseconds(1);
    assert!(codec.validate(token.as_str(), last_moment).is_ok());
    assert_eq!(
      codec.validate(token.as_str(), issued + ttl),
      Err(TokenError::Expired)
    );
  }

  #[test]
  fn token_from_another_secret_is_malformed() {
    let ours = codec(SECRET, 30);
    let theirs = codec("fedcba9876543210fedcba9876543210", 30);
    let now = Utc::now();
    let token = theirs.issue(Uuid::new_v4(), Role::TopAdmin, now).unwrap();

    assert_eq!(ours.validate(token.as_str(), now), Err(TokenError::Malformed));
    assert_eq!(ours.validate("not.a.jwt", now), Err(TokenError::Malformed));
  }

  #[test]
  fn tampered_payload_is_malformed() {
    let codec = codec(SECRET, 30);
    let now = Utc::now();
    let token = codec.issue(Uuid::new_v4(), Role::Employee, now).unwrap();

    let parts: Vec<&str> = token.as_str().split('.').collect();
    let other = codec.issue(Uuid::new_v4(), Role::TopAdmin, now).unwrap();
    let other_payload = other.as_str().split('.').nth(1).unwrap();
    let forged = format!("{}.{}.{}", parts[0], other_payload, parts[2]);

    assert_eq!(codec.validate(&forged, now), Err(TokenError::Malformed));
  }
}
