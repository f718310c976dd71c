//! The `HrStore` trait, the storage collaborator consumed by the core.
//!
//! The trait is implemented by storage backends (e.g. `crew-store-sqlite`).
//! Higher layers (`crew-auth`, `crew-api`) depend on this abstraction, not on
//! any concrete backend.
//!
//! Backends must back every uniqueness invariant with a structural constraint
//! (user email, department name, attendance `(user_id, date)`) and report a
//! violation as [`crate::Error::Conflict`] once converted. Deleting a user
//! must cascade to that user's attendance and leave rows.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  attendance::{AttendancePatch, AttendanceQuery, AttendanceRecord, NewAttendance},
  department::{Department, DepartmentPatch, NewDepartment},
  job_role::{JobRole, JobRolePatch, JobRoleQuery, NewJobRole},
  leave::{LeaveQuery, LeaveRequest, LeaveResolution, NewLeave},
  user::{NewUser, User, UserPatch},
};

/// Abstraction over a Crew storage backend.
///
/// Point lookups return `None` for missing rows; `update_*` return `None` when
/// the row does not exist; `delete_*` return whether a row was removed.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HrStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── Users ─────────────────────────────────────────────────────────────

  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Delete a user together with their attendance and leave rows.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Number of users whose `department_id` is `department_id`.
  fn count_users_in_department(
    &self,
    department_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Departments ───────────────────────────────────────────────────────

  fn add_department(
    &self,
    input: NewDepartment,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  fn get_department(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + '_;

  fn find_department_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + 'a;

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  fn update_department(
    &self,
    id: Uuid,
    patch: DepartmentPatch,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + '_;

  /// Delete a department. Fails with a conflict if any user still references
  /// it, even when the caller's own pre-check raced.
  fn delete_department(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Job roles ─────────────────────────────────────────────────────────

  fn add_job_role(
    &self,
    input: NewJobRole,
  ) -> impl Future<Output = Result<JobRole, Self::Error>> + Send + '_;

  fn get_job_role(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<JobRole>, Self::Error>> + Send + '_;

  fn list_job_roles<'a>(
    &'a self,
    query: &'a JobRoleQuery,
  ) -> impl Future<Output = Result<Vec<JobRole>, Self::Error>> + Send + 'a;

  fn update_job_role(
    &self,
    id: Uuid,
    patch: JobRolePatch,
  ) -> impl Future<Output = Result<Option<JobRole>, Self::Error>> + Send + '_;

  fn delete_job_role(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  fn add_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  fn get_attendance(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<AttendanceRecord>, Self::Error>> + Send + '_;

  fn find_attendance(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<AttendanceRecord>, Self::Error>> + Send + '_;

  /// Newest date first.
  fn list_attendance<'a>(
    &'a self,
    query: &'a AttendanceQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + 'a;

  fn update_attendance(
    &self,
    id: i64,
    patch: AttendancePatch,
  ) -> impl Future<Output = Result<Option<AttendanceRecord>, Self::Error>> + Send + '_;

  fn delete_attendance(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Leave requests ────────────────────────────────────────────────────

  fn add_leave(
    &self,
    input: NewLeave,
  ) -> impl Future<Output = Result<LeaveRequest, Self::Error>> + Send + '_;

  fn get_leave(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<LeaveRequest>, Self::Error>> + Send + '_;

  /// Newest request first.
  fn list_leaves<'a>(
    &'a self,
    query: &'a LeaveQuery,
  ) -> impl Future<Output = Result<Vec<LeaveRequest>, Self::Error>> + Send + 'a;

  /// Apply `resolution` only if the request is still pending.
  ///
  /// Returns `None` when no pending request with `id` exists, so two racing
  /// resolvers cannot both succeed.
  fn resolve_leave(
    &self,
    id: Uuid,
    resolution: LeaveResolution,
  ) -> impl Future<Output = Result<Option<LeaveRequest>, Self::Error>> + Send + '_;

  fn delete_leave(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// Lift a backend result into the core error space.
pub trait StoreResultExt<T> {
  fn into_core(self) -> crate::Result<T>;
}

impl<T, E: Into<crate::Error>> StoreResultExt<T> for Result<T, E> {
  fn into_core(self) -> crate::Result<T> { self.map_err(Into::into) }
}
