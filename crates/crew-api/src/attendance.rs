//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/attendance` | `?user_id&start_date&end_date&limit&offset`; employees see only their own |
//! | `GET`    | `/attendance/my` | The caller's own records, same filters |
//! | `POST`   | `/attendance` | HR and top admin; 409 on a second record for the same day |
//! | `GET`    | `/attendance/{id}` | Owner, HR or top admin |
//! | `PUT`    | `/attendance/{id}` | HR and top admin; `check_out`, `status`, `late_reason` only |
//! | `DELETE` | `/attendance/{id}` | Top admin |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use crew_core::{
  attendance::{AttendancePatch, AttendanceQuery, AttendanceRecord, NewAttendance},
  rules,
  store::HrStore,
  user::Role,
};

use crate::{AppState, error::ApiError};

/// `GET /attendance`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  let records =
    rules::attendance::list(state.store.as_ref(), &caller, query).await?;
  Ok(Json(records))
}

/// `GET /attendance/my`
pub async fn my<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  let records =
    rules::attendance::list_own(state.store.as_ref(), &caller, query).await?;
  Ok(Json(records))
}

/// `POST /attendance`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<NewAttendance>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let record =
    rules::attendance::record(state.store.as_ref(), &caller, body).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /attendance/{id}`
pub async fn get<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<i64>,
) -> Result<Json<AttendanceRecord>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, None).await?;
  let record = rules::attendance::get(state.store.as_ref(), &caller, id).await?;
  Ok(Json(record))
}

/// `PUT /attendance/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<i64>,
  Json(patch): Json<AttendancePatch>,
) -> Result<Json<AttendanceRecord>, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::PRIVILEGED)).await?;
  let record =
    rules::attendance::amend(state.store.as_ref(), &caller, id, patch).await?;
  Ok(Json(record))
}

/// `DELETE /attendance/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: HrStore + Clone + 'static,
{
  let caller = state.caller(&headers, Some(Role::TOP_ADMIN_ONLY)).await?;
  rules::attendance::remove(state.store.as_ref(), &caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
