//! Attendance rules: one record per user per day, HR-managed, ownership-scoped
//! visibility.

use crate::{
  Conflict, Error, Result,
  attendance::{AttendancePatch, AttendanceQuery, AttendanceRecord, NewAttendance},
  store::{HrStore, StoreResultExt},
  user::{Role, User},
};

use super::{require_role, require_text};

/// Record a day of attendance for `input.user_id`.
pub async fn record<S: HrStore>(
  store: &S,
  caller: &User,
  input: NewAttendance,
) -> Result<AttendanceRecord> {
  require_role(caller, Role::PRIVILEGED)?;
  require_text("check_in", &input.check_in)?;

  let existing = store
    .find_attendance(input.user_id, input.date)
    .await
    .into_core()?;
  if existing.is_some() {
    return Err(
      Conflict::DuplicateAttendance { user_id: input.user_id, date: input.date }
        .into(),
    );
  }

  if store.get_user(input.user_id).await.into_core()?.is_none() {
    return Err(Error::not_found("user", input.user_id));
  }

  let record = store.add_attendance(input).await.into_core()?;
  tracing::debug!(
    attendance_id = record.id,
    user_id = %record.user_id,
    date = %record.date,
    recorded_by = %caller.id,
    "attendance recorded"
  );
  Ok(record)
}

/// Read one record: one's own, or anyone's for HR and the top admin.
pub async fn get<S: HrStore>(
  store: &S,
  caller: &User,
  id: i64,
) -> Result<AttendanceRecord> {
  let record = store
    .get_attendance(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("attendance record", id))?;
  if !caller.role.is_privileged() && record.user_id != caller.id {
    return Err(Error::Forbidden("not authorized to view this record"));
  }
  Ok(record)
}

/// Amend the check-out marker, status or late reason of a record.
pub async fn amend<S: HrStore>(
  store: &S,
  caller: &User,
  id: i64,
  patch: AttendancePatch,
) -> Result<AttendanceRecord> {
  require_role(caller, Role::PRIVILEGED)?;
  store
    .update_attendance(id, patch)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("attendance record", id))
}

pub async fn remove<S: HrStore>(store: &S, caller: &User, id: i64) -> Result<()> {
  require_role(caller, Role::TOP_ADMIN_ONLY)?;
  if !store.delete_attendance(id).await.into_core()? {
    return Err(Error::not_found("attendance record", id));
  }
  Ok(())
}

/// List records visible to `caller`.
///
/// Employees only ever see their own rows: any `user_id` they ask for is
/// replaced before the query reaches storage, so pagination never counts other
/// people's rows.
pub async fn list<S: HrStore>(
  store: &S,
  caller: &User,
  mut query: AttendanceQuery,
) -> Result<Vec<AttendanceRecord>> {
  if !caller.role.is_privileged() {
    query.user_id = Some(caller.id);
  }
  store.list_attendance(&query).await.into_core()
}

/// The caller's own records, whatever their role.
pub async fn list_own<S: HrStore>(
  store: &S,
  caller: &User,
  mut query: AttendanceQuery,
) -> Result<Vec<AttendanceRecord>> {
  query.user_id = Some(caller.id);
  store.list_attendance(&query).await.into_core()
}
