//! Runtime configuration and startup bootstrap for the Crew server binary.

use std::path::PathBuf;

use crew_auth::AuthConfig;
use crew_core::{
  store::{HrStore, StoreResultExt},
  user::{NewUser, Profile, Role, User, UserStatus, normalize_email},
};
use serde::Deserialize;

fn default_token_ttl_minutes() -> i64 { 30 }

/// Runtime server configuration, deserialised from `config.toml` and `CREW_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub jwt_secret:          String,
  #[serde(default = "default_token_ttl_minutes")]
  pub token_ttl_minutes:   i64,
  pub admin_email:         String,
  pub admin_name:          String,
  /// Argon2 PHC string, as printed by `server --hash-password`.
  pub admin_password_hash: String,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig::new(self.jwt_secret.clone(), self.token_ttl_minutes)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Make sure the configured top admin exists.
///
/// Returns the created account, or `None` when a user with `admin_email` is
/// already present. An existing account is left untouched whatever its role.
pub async fn ensure_admin<S: HrStore>(
  store: &S,
  config: &ServerConfig,
) -> crew_core::Result<Option<User>> {
  let email = normalize_email(&config.admin_email);
  if store
    .find_user_by_email(&email)
    .await
    .into_core()?
    .is_some()
  {
    tracing::debug!(%email, "bootstrap admin already present");
    return Ok(None);
  }
  if config.admin_password_hash.trim().is_empty() {
    return Err(crew_core::Error::validation(
      "admin_password_hash must be set to create the bootstrap admin",
    ));
  }

  let admin = store
    .add_user(NewUser {
      email:         email.clone(),
      password_hash: config.admin_password_hash.clone(),
      name:          config.admin_name.clone(),
      role:          Role::TopAdmin,
      status:        UserStatus::Active,
      profile:       Profile::default(),
    })
    .await
    .into_core()?;
  tracing::info!(user_id = %admin.id, %email, "created bootstrap admin");
  Ok(Some(admin))
}

#[cfg(test)]
mod tests {
  use crew_auth::{TokenCodec, guard, password};
  use crew_store_sqlite::SqliteStore;

  use super::*;

  fn config(hash: String) -> ServerConfig {
    ServerConfig {
      host:                "127.0.0.1".into(),
      port:                0,
      store_path:          ":memory:".into(),
      jwt_secret:          "bootstrap-test-secret-with-enough-bytes".into(),
      token_ttl_minutes:   30,
      admin_email:         "root@example.com".into(),
      admin_name:          "Root".into(),
      admin_password_hash: hash,
    }
  }

  #[tokio::test]
  async fn admin_is_created_once() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let cfg = config(password::hash("rootpass").unwrap());

    let admin = ensure_admin(&store, &cfg).await.unwrap().unwrap();
    assert_eq!(admin.role, Role::TopAdmin);
    assert!(ensure_admin(&store, &cfg).await.unwrap().is_none());
    assert_eq!(store.list_users().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn bootstrap_admin_can_log_in() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let cfg = config(password::hash("rootpass").unwrap());
    ensure_admin(&store, &cfg).await.unwrap();

    let codec = TokenCodec::new(&cfg.auth()).unwrap();
    let (user, _) = guard::login(
      &codec,
      &store,
      "root@example.com",
      "rootpass",
      chrono::Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(user.role, Role::TopAdmin);
  }

  #[tokio::test]
  async fn missing_hash_is_rejected() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let err = ensure_admin(&store, &config(String::new())).await.unwrap_err();
    assert!(matches!(err, crew_core::Error::Validation(_)));
    assert!(store.list_users().await.unwrap().is_empty());
  }

  #[test]
  fn ttl_defaults_to_thirty_minutes() {
    let cfg: ServerConfig = serde_json::from_value(serde_json::json!({
      "host": "0.0.0.0",
      "port": 8000,
      "store_path": "~/.local/share/crew/crew.db",
      "jwt_secret": "x",
      "admin_email": "root@example.com",
      "admin_name": "Root",
      "admin_password_hash": "",
    }))
    .unwrap();
    assert_eq!(cfg.token_ttl_minutes, 30);
    assert_eq!(cfg.address(), "0.0.0.0:8000");
  }
}
