//! Job role rules: the department must exist and the salary band must be
//! ordered.

use uuid::Uuid;

use crate::{
  Error, Result,
  job_role::{JobRole, JobRolePatch, JobRoleQuery, NewJobRole},
  store::{HrStore, StoreResultExt},
  user::{Role, User},
};

use super::{require_role, require_text};

fn check_band(min_salary: f64, max_salary: f64) -> Result<()> {
  if min_salary < 0.0 || min_salary > max_salary {
    return Err(Error::validation(format!(
      "salary band {min_salary}..{max_salary} is not ordered"
    )));
  }
  Ok(())
}

async fn require_department<S: HrStore>(store: &S, id: Uuid) -> Result<()> {
  match store.get_department(id).await.into_core()? {
    Some(_) => Ok(()),
    None => Err(Error::not_found("department", id)),
  }
}

pub async fn list<S: HrStore>(
  store: &S,
  query: &JobRoleQuery,
) -> Result<Vec<JobRole>> {
  store.list_job_roles(query).await.into_core()
}

pub async fn get<S: HrStore>(store: &S, id: Uuid) -> Result<JobRole> {
  store
    .get_job_role(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("role", id))
}

pub async fn create<S: HrStore>(
  store: &S,
  caller: &User,
  input: NewJobRole,
) -> Result<JobRole> {
  require_role(caller, Role::PRIVILEGED)?;
  require_text("title", &input.title)?;
  check_band(input.min_salary, input.max_salary)?;
  require_department(store, input.department_id).await?;

  store.add_job_role(input).await.into_core()
}

/// Update a job role. The band is checked against the merged values so a
/// patch that only moves one bound cannot invert it.
pub async fn update<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
  patch: JobRolePatch,
) -> Result<JobRole> {
  require_role(caller, Role::PRIVILEGED)?;
  let current = get(store, id).await?;

  if let Some(title) = &patch.title {
    require_text("title", title)?;
  }
  check_band(
    patch.min_salary.unwrap_or(current.min_salary),
    patch.max_salary.unwrap_or(current.max_salary),
  )?;
  if let Some(department_id) = patch.department_id {
    require_department(store, department_id).await?;
  }

  store
    .update_job_role(id, patch)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("role", id))
}

pub async fn delete<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
) -> Result<()> {
  require_role(caller, Role::TOP_ADMIN_ONLY)?;
  if !store.delete_job_role(id).await.into_core()? {
    return Err(Error::not_found("role", id));
  }
  Ok(())
}
