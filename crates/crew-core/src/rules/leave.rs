//! Leave workflow rules.
//!
//! `pending → approved | rejected` is the only edge. Any attempt to resolve a
//! request that is no longer pending is a conflict.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Conflict, Error, Result,
  leave::{
    LeaveApplication, LeaveQuery, LeaveRequest, LeaveResolution, LeaveStatus,
    NewLeave,
  },
  store::{HrStore, StoreResultExt},
  user::{Role, User},
};

use super::{require_role, require_text};

/// File a new request owned by `caller`.
pub async fn apply<S: HrStore>(
  store: &S,
  caller: &User,
  application: LeaveApplication,
) -> Result<LeaveRequest> {
  require_text("leave_type", &application.leave_type)?;
  require_text("reason", &application.reason)?;
  if application.end_date < application.start_date {
    return Err(Error::validation("end_date must not precede start_date"));
  }

  let leave = store
    .add_leave(NewLeave { user_id: caller.id, application })
    .await
    .into_core()?;
  tracing::debug!(leave_id = %leave.id, user_id = %caller.id, "leave requested");
  Ok(leave)
}

/// Approve or reject a pending request, stamping the resolver and time.
pub async fn resolve<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
  status: LeaveStatus,
) -> Result<LeaveRequest> {
  require_role(caller, Role::PRIVILEGED)?;
  if !status.is_terminal() {
    return Err(Error::validation(
      "a leave request can only be approved or rejected",
    ));
  }

  let current = store
    .get_leave(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("leave request", id))?;
  if current.status.is_terminal() {
    return Err(
      Conflict::LeaveAlreadyResolved { id, status: current.status }.into(),
    );
  }

  let resolution = LeaveResolution {
    status,
    approved_by: caller.id,
    approved_at: Utc::now(),
  };

  match store.resolve_leave(id, resolution).await.into_core()? {
    Some(leave) => {
      tracing::info!(
        leave_id = %id,
        status = %leave.status,
        resolved_by = %caller.id,
        "leave resolved"
      );
      Ok(leave)
    }
    // Lost a race with another resolver (or a delete) after the pre-check.
    None => match store.get_leave(id).await.into_core()? {
      Some(leave) => Err(
        Conflict::LeaveAlreadyResolved { id, status: leave.status }.into(),
      ),
      None => Err(Error::not_found("leave request", id)),
    },
  }
}

/// Delete a request. Allowed for its owner and for HR or the top admin.
pub async fn withdraw<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
) -> Result<()> {
  let leave = store
    .get_leave(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("leave request", id))?;

  if leave.user_id != caller.id && !caller.role.is_privileged() {
    return Err(Error::Forbidden(
      "only the owner or HR may delete a leave request",
    ));
  }

  if !store.delete_leave(id).await.into_core()? {
    return Err(Error::not_found("leave request", id));
  }
  Ok(())
}

/// List requests visible to `caller`; employees are scoped to their own.
pub async fn list<S: HrStore>(
  store: &S,
  caller: &User,
  mut query: LeaveQuery,
) -> Result<Vec<LeaveRequest>> {
  if !caller.role.is_privileged() {
    query.user_id = Some(caller.id);
  }
  store.list_leaves(&query).await.into_core()
}

pub async fn list_own<S: HrStore>(
  store: &S,
  caller: &User,
  mut query: LeaveQuery,
) -> Result<Vec<LeaveRequest>> {
  query.user_id = Some(caller.id);
  store.list_leaves(&query).await.into_core()
}
