//! Handlers for `/departments` endpoints.
//!
//! Reads are open to any active user. Create and update need HR or the top
//! admin; delete needs the top admin and fails with 409 while anyone is
//! still assigned.

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use crew_core::{
  department::{Department, DepartmentPatch, NewDepartment},
  rules,
  store::HrStore,
  user::Role,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /departments`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Department>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  state.caller(&headers, None).await?;
  Ok(Json(rules::department::list(state.store.as_ref()).await?))
}

/// `GET /departments/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<Department>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  state.caller(&headers, None).await?;
  Ok(Json(rules::department::get(state.store.as_ref(), id).await?))
}

/// `POST /departments`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<NewDepartment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let department =
    rules::department::create(state.store.as_ref(), &caller, body).await?;
  Ok((StatusCode::CREATED, Json(department)))
}

/// `PUT /departments/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  Json(patch): Json<DepartmentPatch>,
) -> Result<Json<Department>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let department =
    rules::department::update(state.store.as_ref(), &caller, id, patch).await?;
  Ok(Json(department))
}

/// `DELETE /departments/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::TOP_ADMIN_ONLY)).await?;
  rules::department::delete(state.store.as_ref(), &caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
