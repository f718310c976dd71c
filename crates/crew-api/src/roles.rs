//! Handlers for `/roles` endpoints (job roles, not access roles).
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/roles` | Optional `?department_id=<uuid>&level=<tag>` |
//! | `GET`    | `/roles/{id}` | 404 if not found |
//! | `POST`   | `/roles` | HR and top admin; department must exist |
//! | `PUT`    | `/roles/{id}` | HR and top admin |
//! | `DELETE` | `/roles/{id}` | Top admin |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use crew_core::{
  job_role::{JobRole, JobRolePatch, JobRoleQuery, NewJobRole},
  rules,
  store::HrStore,
  user::Role,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /roles[?department_id=..][&level=..]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(query): Query<JobRoleQuery>,
) -> Result<Json<Vec<JobRole>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  state.caller(&headers, None).await?;
  Ok(Json(rules::job_role::list(state.store.as_ref(), &query).await?))
}

/// `GET /roles/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<JobRole>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  state.caller(&headers, None).await?;
  Ok(Json(rules::job_role::get(state.store.as_ref(), id).await?))
}

/// `POST /roles`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<NewJobRole>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let role = rules::job_role::create(state.store.as_ref(), &caller, body).await?;
  Ok((StatusCode::CREATED, Json(role)))
}

/// `PUT /roles/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  Json(patch): Json<JobRolePatch>,
) -> Result<Json<JobRole>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let role =
    rules::job_role::update(state.store.as_ref(), &caller, id, patch).await?;
  Ok(Json(role))
}

/// `DELETE /roles/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::TOP_ADMIN_ONLY)).await?;
  rules::job_role::delete(state.store.as_ref(), &caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
