//! Department rules: unique names, no deletion while staffed.

use uuid::Uuid;

use crate::{
  Conflict, Error, Result,
  department::{Department, DepartmentPatch, NewDepartment},
  store::{HrStore, StoreResultExt},
  user::{Role, User},
};

use super::{require_role, require_text};

pub async fn list<S: HrStore>(store: &S) -> Result<Vec<Department>> {
  store.list_departments().await.into_core()
}

pub async fn get<S: HrStore>(store: &S, id: Uuid) -> Result<Department> {
  store
    .get_department(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("department", id))
}

pub async fn create<S: HrStore>(
  store: &S,
  caller: &User,
  input: NewDepartment,
) -> Result<Department> {
  require_role(caller, Role::PRIVILEGED)?;
  require_text("name", &input.name)?;

  if store
    .find_department_by_name(&input.name)
    .await
    .into_core()?
    .is_some()
  {
    return Err(Conflict::DuplicateDepartment(input.name).into());
  }

  let department = store.add_department(input).await.into_core()?;
  tracing::info!(department_id = %department.id, name = %department.name, "department created");
  Ok(department)
}

pub async fn update<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
  patch: DepartmentPatch,
) -> Result<Department> {
  require_role(caller, Role::PRIVILEGED)?;

  if let Some(name) = &patch.name {
    require_text("name", name)?;
    let clash = store
      .find_department_by_name(name)
      .await
      .into_core()?;
    if clash.is_some_and(|other| other.id != id) {
      return Err(Conflict::DuplicateDepartment(name.clone()).into());
    }
  }

  store
    .update_department(id, patch)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("department", id))
}

/// Delete a department nobody is assigned to.
pub async fn delete<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
) -> Result<()> {
  require_role(caller, Role::TOP_ADMIN_ONLY)?;
  get(store, id).await?;

  let assigned = store
    .count_users_in_department(id)
    .await
    .into_core()?;
  if assigned > 0 {
    return Err(Conflict::DepartmentInUse { id, assigned }.into());
  }

  if !store.delete_department(id).await.into_core()? {
    return Err(Error::not_found("department", id));
  }
  tracing::info!(department_id = %id, "department deleted");
  Ok(())
}
