use chrono::Duration;

/// Token settings, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct AuthConfig {
  /// HMAC signing secret. Must be at least
  /// [`MIN_SECRET_LEN`](crate::token::MIN_SECRET_LEN) bytes.
  pub jwt_secret: String,
  pub token_ttl:  Duration,
}

impl AuthConfig {
  pub fn new(jwt_secret: impl Into<String>, token_ttl_minutes: i64) -> Self {
    Self {
      jwt_secret: jwt_secret.into(),
      token_ttl:  Duration::minutes(token_ttl_minutes),
    }
  }
}

impl std::fmt::Debug for AuthConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AuthConfig")
      .field("jwt_secret", &"<redacted>")
      .field("token_ttl", &self.token_ttl)
      .finish()
  }
}
