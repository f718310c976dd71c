//! Handlers for `/leaves` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/leaves` | `?status&user_id&limit&offset`; employees see only their own |
//! | `GET`    | `/leaves/my` | The caller's own requests |
//! | `POST`   | `/leaves` | Any active user; the caller owns the request |
//! | `PUT`    | `/leaves/{id}` | HR and top admin; body `{"status":"approved"\|"rejected"}` |
//! | `DELETE` | `/leaves/{id}` | The owner, HR or the top admin |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use crew_core::{
  leave::{LeaveApplication, LeaveQuery, LeaveRequest, LeaveStatus},
  rules,
  store::HrStore,
  user::Role,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /leaves`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(query): Query<LeaveQuery>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  Ok(Json(rules::leave::list(state.store.as_ref(), &caller, query).await?))
}

/// `GET /leaves/my`
pub async fn my<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(query): Query<LeaveQuery>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  Ok(Json(
    rules::leave::list_own(state.store.as_ref(), &caller, query).await?,
  ))
}

/// `POST /leaves`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<LeaveApplication>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  let leave = rules::leave::apply(state.store.as_ref(), &caller, body).await?;
  Ok((StatusCode::CREATED, Json(leave)))
}

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
  pub status: LeaveStatus,
}

/// `PUT /leaves/{id}`
pub async fn resolve<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  Json(body): Json<ResolveBody>,
) -> Result<Json<LeaveRequest>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let leave =
    rules::leave::resolve(state.store.as_ref(), &caller, id, body.status).await?;
  Ok(Json(leave))
}

/// `DELETE /leaves/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  rules::leave::withdraw(state.store.as_ref(), &caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
