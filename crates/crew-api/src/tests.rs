//! End-to-end tests: requests through the full router against an in-memory
//! store.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use chrono::Utc;
use crew_auth::{AuthConfig, TokenCodec, password};
use crew_core::{
  attendance::AttendanceQuery,
  department::NewDepartment,
  store::HrStore,
  user::{NewUser, Profile, Role, User, UserPatch, UserStatus},
};
use crew_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, router};

const SECRET: &str = "test-signing-secret-of-adequate-length";

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let codec = TokenCodec::new(&AuthConfig::new(SECRET, 30)).unwrap();
  AppState::new(store, codec)
}

async fn seed(state: &AppState<SqliteStore>, email: &str, role: Role) -> User {
  state
    .store
    .add_user(NewUser {
      email:         email.into(),
      password_hash: password::hash("password1").unwrap(),
      name:          email.into(),
      role,
      status:        UserStatus::Active,
      profile:       Profile::default(),
    })
    .await
    .unwrap()
}

fn bearer(state: &AppState<SqliteStore>, user: &User) -> String {
  let token = state.codec.issue(user.id, user.role, Utc::now()).unwrap();
  format!("Bearer {}", token.as_str())
}

async fn oneshot_raw(
  state:  AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  auth:   Option<&str>,
  body:   Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(auth) = auth {
    builder = builder.header(header::AUTHORIZATION, auth);
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn attendance_body(user: &User) -> Value {
  json!({
    "user_id": user.id,
    "date": "2024-04-01",
    "check_in": "09:00 AM",
    "status": "present",
  })
}

// ── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_public() {
  let state = make_state().await;
  let resp = oneshot_raw(state, "GET", "/health", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["status"], "ok");
}

// ── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_login() {
  let state = make_state().await;
  let body = json!({
    "email": "new@example.com",
    "password": "s3cret!",
    "name": "New Hire",
    "phone": "555-0199",
  });

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/auth/register", None, Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let user = json_body(resp).await;
  assert_eq!(user["role"], "employee");
  assert_eq!(user["phone"], "555-0199");
  assert!(user.get("password_hash").is_none());

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/auth/register", None, Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let login = json!({ "email": "new@example.com", "password": "s3cret!" });
  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/auth/login", None, Some(login)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["token_type"], "bearer");
  assert_eq!(body["expires_in"], 30 * 60);
  assert_eq!(body["user"]["email"], "new@example.com");

  let auth = format!("Bearer {}", body["access_token"].as_str().unwrap());
  let resp = oneshot_raw(state, "GET", "/api/v1/users/me", Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["email"], "new@example.com");
}

#[tokio::test]
async fn json_login_alias_ignores_email_case() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;

  let login = json!({ "email": "Emp@Example.com", "password": "password1" });
  let resp = oneshot_raw(state, "POST", "/api/v1/auth/login/json", None, Some(login)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["user"]["id"], emp.id.to_string());
}

#[tokio::test]
async fn register_cannot_claim_a_privileged_role() {
  let state = make_state().await;
  let body = json!({
    "email": "sneaky@example.com",
    "password": "s3cret!",
    "name": "Sneaky",
    "role": "top_admin",
  });
  let resp = oneshot_raw(state, "POST", "/api/v1/auth/register", None, Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["role"], "employee");
}

#[tokio::test]
async fn register_rejects_short_password() {
  let state = make_state().await;
  let body = json!({ "email": "a@example.com", "password": "123", "name": "A" });
  let resp = oneshot_raw(state, "POST", "/api/v1/auth/register", None, Some(body)).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_login_is_401_with_challenge() {
  let state = make_state().await;
  seed(&state, "emp@example.com", Role::Employee).await;

  for (email, pass) in [("emp@example.com", "wrong-pass"), ("ghost@example.com", "password1")] {
    let login = json!({ "email": email, "password": pass });
    let resp = oneshot_raw(state.clone(), "POST", "/api/v1/auth/login", None, Some(login)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(json_body(resp).await["error"], "invalid credentials");
  }
}

#[tokio::test]
async fn missing_or_garbage_token_is_401() {
  let state = make_state().await;
  let resp = oneshot_raw(state.clone(), "GET", "/api/v1/users/me", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = oneshot_raw(state, "GET", "/api/v1/users/me", Some("Bearer nope"), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_user_is_403() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let auth = bearer(&state, &emp);
  state
    .store
    .update_user(emp.id, UserPatch {
      status: Some(UserStatus::Deactivated),
      ..Default::default()
    })
    .await
    .unwrap();

  let resp = oneshot_raw(state, "GET", "/api/v1/users/me", Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_listing_is_role_gated() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let hr = seed(&state, "hr@example.com", Role::Hr).await;

  let resp = oneshot_raw(state.clone(), "GET", "/api/v1/users", Some(&bearer(&state, &emp)), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state.clone(), "GET", "/api/v1/users", Some(&bearer(&state, &hr)), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);

  let uri = format!("/api/v1/users/{}", hr.id);
  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&bearer(&state, &emp)), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hr_cannot_mint_hr_accounts() {
  let state = make_state().await;
  let hr = seed(&state, "hr@example.com", Role::Hr).await;
  let top = seed(&state, "top@example.com", Role::TopAdmin).await;
  let body = json!({
    "email": "hr2@example.com",
    "password": "password2",
    "name": "Second HR",
    "role": "hr",
  });

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/users", Some(&bearer(&state, &hr)), Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/users", Some(&bearer(&state, &top)), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["role"], "hr");
}

#[tokio::test]
async fn privileged_create_is_refused_before_the_password_is_checked() {
  let state = make_state().await;
  let hr = seed(&state, "hr@example.com", Role::Hr).await;
  let body = json!({
    "email": "boss@example.com",
    "password": "x",
    "name": "Boss",
    "role": "top_admin",
  });

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/users", Some(&bearer(&state, &hr)), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(state.store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn employee_cannot_raise_own_salary() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let uri = format!("/api/v1/users/{}", emp.id);
  let auth = bearer(&state, &emp);

  let resp = oneshot_raw(state.clone(), "PUT", &uri, Some(&auth), Some(json!({ "salary": 1e6 }))).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state, "PUT", &uri, Some(&auth), Some(json!({ "address": "12 Elm St" }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["address"], "12 Elm St");
}

// ── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn employee_cannot_create_attendance() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/v1/attendance",
    Some(&bearer(&state, &emp)),
    Some(attendance_body(&emp)),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let rows = state.store.list_attendance(&AttendanceQuery::default()).await.unwrap();
  assert!(rows.is_empty());
}

#[tokio::test]
async fn hr_creates_exactly_one_attendance_per_day() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let hr = seed(&state, "hr@example.com", Role::Hr).await;
  let auth = bearer(&state, &hr);

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/attendance", Some(&auth), Some(attendance_body(&emp))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/attendance", Some(&auth), Some(attendance_body(&emp))).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let rows = state.store.list_attendance(&AttendanceQuery::default()).await.unwrap();
  assert_eq!(rows.len(), 1);

  let resp = oneshot_raw(state.clone(), "GET", "/api/v1/attendance/my", Some(&bearer(&state, &emp)), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

  let resp = oneshot_raw(state, "GET", "/api/v1/attendance/my", Some(&auth), None).await;
  assert!(json_body(resp).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn attendance_record_is_readable_by_owner_and_staff() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let other = seed(&state, "other@example.com", Role::Employee).await;
  let hr = seed(&state, "hr@example.com", Role::Hr).await;
  let hr_auth = bearer(&state, &hr);

  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/attendance", Some(&hr_auth), Some(attendance_body(&emp))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let id = json_body(resp).await["id"].as_i64().unwrap();
  let uri = format!("/api/v1/attendance/{id}");

  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&bearer(&state, &emp)), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["user_id"], emp.id.to_string());

  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&bearer(&state, &other)), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&hr_auth), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = oneshot_raw(state, "GET", "/api/v1/attendance/999999", Some(&hr_auth), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Leaves ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn leave_approval_happens_once() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let hr = seed(&state, "hr@example.com", Role::Hr).await;
  let emp_auth = bearer(&state, &emp);
  let hr_auth = bearer(&state, &hr);

  let application = json!({
    "leave_type": "annual",
    "start_date": "2024-08-01",
    "end_date": "2024-08-05",
    "reason": "holiday",
  });
  let resp = oneshot_raw(state.clone(), "POST", "/api/v1/leaves", Some(&emp_auth), Some(application)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let leave = json_body(resp).await;
  assert_eq!(leave["status"], "pending");
  assert_eq!(leave["half_day"], false);
  let uri = format!("/api/v1/leaves/{}", leave["id"].as_str().unwrap());

  let approve = json!({ "status": "approved" });
  let resp = oneshot_raw(state.clone(), "PUT", &uri, Some(&emp_auth), Some(approve.clone())).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state.clone(), "PUT", &uri, Some(&hr_auth), Some(approve)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let resolved = json_body(resp).await;
  assert_eq!(resolved["status"], "approved");
  assert_eq!(resolved["approved_by"], hr.id.to_string());

  let reject = json!({ "status": "rejected" });
  let resp = oneshot_raw(state, "PUT", &uri, Some(&hr_auth), Some(reject)).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn employee_leave_listing_is_scoped() {
  let state = make_state().await;
  let a = seed(&state, "a@example.com", Role::Employee).await;
  let b = seed(&state, "b@example.com", Role::Employee).await;
  let application = json!({
    "leave_type": "sick",
    "start_date": "2024-09-02",
    "end_date": "2024-09-02",
    "reason": "cold",
    "half_day": true,
  });
  for user in [&a, &b] {
    let resp = oneshot_raw(state.clone(), "POST", "/api/v1/leaves", Some(&bearer(&state, user)), Some(application.clone())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  let uri = format!("/api/v1/leaves?user_id={}", b.id);
  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&bearer(&state, &a)), None).await;
  let rows = json_body(resp).await;
  let rows = rows.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["user_id"], a.id.to_string());
}

// ── Departments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn staffed_department_delete_is_409() {
  let state = make_state().await;
  let top = seed(&state, "top@example.com", Role::TopAdmin).await;
  let dept = state
    .store
    .add_department(NewDepartment {
      name:               "Legal".into(),
      description:        None,
      head_of_department: None,
    })
    .await
    .unwrap();
  let profile = Profile { department_id: Some(dept.id), ..Default::default() };
  let counsel = state
    .store
    .add_user(NewUser {
      email: "counsel@example.com".into(),
      password_hash: String::new(),
      name: "Counsel".into(),
      role: Role::Employee,
      status: UserStatus::Active,
      profile,
    })
    .await
    .unwrap();

  let uri = format!("/api/v1/departments/{}", dept.id);
  let resp = oneshot_raw(state.clone(), "DELETE", &uri, Some(&bearer(&state, &top)), None).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&bearer(&state, &top)), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  // An explicit null unassigns the user and frees the department.
  let user_uri = format!("/api/v1/users/{}", counsel.id);
  let unassign = json!({ "department_id": null });
  let resp = oneshot_raw(state.clone(), "PUT", &user_uri, Some(&bearer(&state, &top)), Some(unassign)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(json_body(resp).await["department_id"].is_null());

  let resp = oneshot_raw(state.clone(), "DELETE", &uri, Some(&bearer(&state, &top)), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_department_is_404() {
  let state = make_state().await;
  let emp = seed(&state, "emp@example.com", Role::Employee).await;
  let uri = format!("/api/v1/departments/{}", uuid::Uuid::new_v4());
  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&bearer(&state, &emp)), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
