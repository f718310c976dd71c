//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Public; always creates an active employee |
//! | `POST` | `/auth/login` | Public; returns a bearer token and the user |
//! | `POST` | `/auth/login/json` | Alias of `/auth/login` |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use crew_auth::{guard, password};
use crew_core::{
  rules,
  store::HrStore,
  user::{NewUser, Profile, Role, User, UserStatus},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    String,
  pub password: String,
  pub name:     String,
  #[serde(flatten)]
  pub profile:  Profile,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HrStore + Clone + 'static,
{
  password::check_strength(&body.password)?;
  let input = NewUser {
    email:         body.email,
    password_hash: password::hash(&body.password)?,
    name:          body.name,
    role:          Role::Employee,
    status:        UserStatus::Active,
    profile:       body.profile,
  };
  let user = rules::user::register(state.store.as_ref(), input).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub access_token: String,
  pub token_type:   &'static str,
  /// Lifetime of `access_token` in seconds.
  pub expires_in:   i64,
  pub user:         User,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let (user, token) = guard::login(
    &state.codec,
    state.store.as_ref(),
    &body.email,
    &body.password,
    Utc::now(),
  )
  .await?;

  Ok(Json(LoginResponse {
    access_token: token.into_string(),
    token_type: "bearer",
    expires_in: state.codec.ttl_secs(),
    user,
  }))
}
