//! User rules: unique emails, role-gated account creation, ownership of
//! profiles and protection of the top admin account.

use uuid::Uuid;

use crate::{
  Conflict, Error, Result,
  store::{HrStore, StoreResultExt},
  user::{NewUser, Role, User, UserPatch, UserStatus, normalize_email},
};

use super::{require_role, require_text};

async fn require_department<S: HrStore>(
  store: &S,
  department_id: Option<Uuid>,
) -> Result<()> {
  let Some(id) = department_id else { return Ok(()) };
  match store.get_department(id).await.into_core()? {
    Some(_) => Ok(()),
    None => Err(Error::not_found("department", id)),
  }
}

async fn insert<S: HrStore>(store: &S, mut input: NewUser) -> Result<User> {
  input.email = normalize_email(&input.email);
  require_text("name", &input.name)?;
  if !input.email.contains('@') {
    return Err(Error::validation("email address is not valid"));
  }

  if store
    .find_user_by_email(&input.email)
    .await
    .into_core()?
    .is_some()
  {
    return Err(Conflict::DuplicateEmail(input.email).into());
  }
  require_department(store, input.profile.department_id).await?;

  let user = store.add_user(input).await.into_core()?;
  tracing::info!(user_id = %user.id, role = %user.role, "user created");
  Ok(user)
}

/// Self-service sign-up. Always yields an active employee, whatever the
/// input asked for.
pub async fn register<S: HrStore>(store: &S, mut input: NewUser) -> Result<User> {
  input.role = Role::Employee;
  input.status = UserStatus::Active;
  insert(store, input).await
}

/// Whether `caller` may create an account with `role`. Only the top admin
/// may mint HR or top admin accounts.
pub fn check_create(caller: &User, role: Role) -> Result<()> {
  require_role(caller, Role::PRIVILEGED)?;
  if role.is_privileged() && caller.role != Role::TopAdmin {
    return Err(Error::Forbidden(
      "only the top admin may create privileged accounts",
    ));
  }
  Ok(())
}

/// Create an account on someone else's behalf, gated by [`check_create`].
pub async fn create<S: HrStore>(
  store: &S,
  caller: &User,
  input: NewUser,
) -> Result<User> {
  check_create(caller, input.role)?;
  insert(store, input).await
}

pub async fn list<S: HrStore>(store: &S, caller: &User) -> Result<Vec<User>> {
  require_role(caller, Role::PRIVILEGED)?;
  store.list_users().await.into_core()
}

/// Read a profile: one's own, or anyone's for HR and the top admin.
pub async fn get<S: HrStore>(store: &S, caller: &User, id: Uuid) -> Result<User> {
  let user = store
    .get_user(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("user", id))?;

  if caller.id != id && !caller.role.is_privileged() {
    return Err(Error::Forbidden("not authorized to view this user"));
  }
  Ok(user)
}

/// Update a profile.
///
/// Anyone may edit their own contact details. Employment fields (department,
/// position, salary, status, resignation date) are HR-only, and only the top
/// admin may touch the top admin's record.
pub async fn update<S: HrStore>(
  store: &S,
  caller: &User,
  id: Uuid,
  patch: UserPatch,
) -> Result<User> {
  let target = get(store, caller, id).await?;

  if patch.touches_employment() && !caller.role.is_privileged() {
    return Err(Error::Forbidden("employment fields are managed by HR"));
  }
  if target.role == Role::TopAdmin && caller.role != Role::TopAdmin {
    return Err(Error::Forbidden("only the top admin may modify this account"));
  }
  if let Some(name) = &patch.name {
    require_text("name", name)?;
  }
  require_department(store, patch.department_id.flatten()).await?;

  let user = store
    .update_user(id, patch)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("user", id))?;
  if user.status != target.status {
    tracing::info!(
      user_id = %id,
      from = target.status.as_str(),
      to = user.status.as_str(),
      changed_by = %caller.id,
      "user status changed"
    );
  }
  Ok(user)
}

/// Delete a user and, through the store's cascade, their attendance and
/// leave history. The top admin account can never be deleted.
pub async fn delete<S: HrStore>(store: &S, caller: &User, id: Uuid) -> Result<()> {
  require_role(caller, Role::PRIVILEGED)?;
  let target = store
    .get_user(id)
    .await
    .into_core()?
    .ok_or_else(|| Error::not_found("user", id))?;

  if target.role == Role::TopAdmin {
    return Err(Error::Forbidden("cannot delete the highest-privilege account"));
  }

  if !store.delete_user(id).await.into_core()? {
    return Err(Error::not_found("user", id));
  }
  tracing::info!(user_id = %id, deleted_by = %caller.id, "user deleted");
  Ok(())
}
