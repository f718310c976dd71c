//! Integration tests for `SqliteStore` and for the core rules running against
//! it, all on in-memory databases.


use chrono::NaiveDate;
use crew_core::{
  department::{Department, NewDepartment},
  store::HrStore,
  user::{NewUser, Profile, Role, User, UserStatus},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str, role: Role) -> NewUser {
  NewUser {
    email:         email.into(),
    password_hash: "not-a-real-hash".into(),
    name:          email.split('@').next().unwrap_or(email).into(),
    role,
    status:        UserStatus::Active,
    profile:       Profile::default(),
  }
}

async fn add_user(s: &SqliteStore, email: &str, role: Role) -> User {
  s.add_user(new_user(email, role)).await.unwrap()
}

async fn add_user_in(
  s: &SqliteStore,
  email: &str,
  department_id: Uuid,
) -> User {
  let mut input = new_user(email, Role::Employee);
  input.profile.department_id = Some(department_id);
  s.add_user(input).await.unwrap()
}

async fn add_department(s: &SqliteStore, name: &str) -> Department {
  s.add_department(NewDepartment {
    name:               name.into(),
    description:        None,
    head_of_department: None,
  })
  .await
  .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
