//! JSON REST API for Crew.
//!
//! Exposes an axum [`Router`] backed by any [`HrStore`]. Every route under
//! `/api/v1` except registration and login resolves its caller through the
//! bearer-token guard before touching the domain rules.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = crew_api::router(AppState::new(store, codec));
//! axum::serve(listener, app).await?;
//! ```

pub mod attendance;
pub mod auth;
pub mod departments;
pub mod error;
pub mod leaves;
pub mod roles;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  http::{HeaderMap, header},
  routing::{get, post, put},
};
use chrono::Utc;
use crew_auth::{TokenCodec, guard};
use crew_core::{
  store::HrStore,
  user::{Role, User},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: HrStore> {
  pub store: Arc<S>,
  pub codec: Arc<TokenCodec>,
}

impl<S: HrStore> AppState<S> {
  pub fn new(store: S, codec: TokenCodec) -> Self {
    Self { store: Arc::new(store), codec: Arc::new(codec) }
  }

  /// Resolve the caller from the request's `Authorization` header.
  ///
  /// `required` of `None` admits any active user.
  pub async fn caller(
    &self,
    headers: &HeaderMap,
    required: Option<&[Role]>,
  ) -> Result<User, ApiError> {
    let authorization = headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok());
    let user = guard::authorize(
      &self.codec,
      self.store.as_ref(),
      authorization,
      required,
      Utc::now(),
    )
    .await?;
    Ok(user)
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router: `/health` plus the `/api/v1` tree.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: HrStore + Clone + 'static,
{
  let api = Router::new()
    // Auth
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/login/json", post(auth::login::<S>))
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/me", get(users::me::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete::<S>),
    )
    // Departments
    .route(
      "/departments",
      get(departments::list::<S>).post(departments::create::<S>),
    )
    .route(
      "/departments/{id}",
      get(departments::get_one::<S>)
        .put(departments::update::<S>)
        .delete(departments::delete::<S>),
    )
    // Job roles
    .route("/roles", get(roles::list::<S>).post(roles::create::<S>))
    .route(
      "/roles/{id}",
      get(roles::get_one::<S>)
        .put(roles::update::<S>)
        .delete(roles::delete::<S>),
    )
    // Attendance
    .route(
      "/attendance",
      get(attendance::list::<S>).post(attendance::create::<S>),
    )
    .route("/attendance/my", get(attendance::my::<S>))
    .route(
      "/attendance/{id}",
      get(attendance::get::<S>)
        .put(attendance::update::<S>)
        .delete(attendance::delete::<S>),
    )
    // Leaves
    .route("/leaves", get(leaves::list::<S>).post(leaves::create::<S>))
    .route("/leaves/my", get(leaves::my::<S>))
    .route(
      "/leaves/{id}",
      put(leaves::resolve::<S>).delete(leaves::delete::<S>),
    );

  Router::new()
    .route("/health", get(health))
    .nest("/api/v1", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

#[cfg(test)]
mod tests;
