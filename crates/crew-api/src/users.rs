//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/users` | HR and top admin |
//! | `POST`   | `/users` | HR and top admin; privileged roles need the top admin |
//! | `GET`    | `/users/me` | The caller's own profile |
//! | `GET`    | `/users/{id}` | Own profile, or anyone's for HR |
//! | `PUT`    | `/users/{id}` | Contact fields for oneself; employment fields for HR |
//! | `DELETE` | `/users/{id}` | HR and top admin; 204 on success |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use crew_auth::password;
use crew_core::{
  rules,
  store::HrStore,
  user::{NewUser, Profile, Role, User, UserPatch, UserStatus},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

fn default_role() -> Role { Role::Employee }

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let users = rules::user::list(state.store.as_ref(), &caller).await?;
  Ok(Json(users))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub email:    String,
  pub password: String,
  pub name:     String,
  #[serde(default = "default_role")]
  pub role:     Role,
  #[serde(default)]
  pub status:   UserStatus,
  #[serde(flatten)]
  pub profile:  Profile,
}

/// `POST /users`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  // Refuse before paying for the hash.
  rules::user::check_create(&caller, body.role)?;
  password::check_strength(&body.password)?;

  let input = NewUser {
    email:         body.email,
    password_hash: password::hash(&body.password)?,
    name:          body.name,
    role:          body.role,
    status:        body.status,
    profile:       body.profile,
  };
  let user = rules::user::create(state.store.as_ref(), &caller, input).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Read ────────────────────────────────────────────────────────────────────

/// `GET /users/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<User>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  Ok(Json(state.caller(&headers, None).await?))
}

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  let user = rules::user::get(state.store.as_ref(), &caller, id).await?;
  Ok(Json(user))
}

// ─── Update / delete ─────────────────────────────────────────────────────────

/// `PUT /users/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  let user = rules::user::update(state.store.as_ref(), &caller, id, patch).await?;
  Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  rules::user::delete(state.store.as_ref(), &caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
