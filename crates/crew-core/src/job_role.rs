//! Job roles: positions within a department with a salary band.
//!
//! Not to be confused with [`crate::user::Role`], which governs access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRole {
  pub id:            Uuid,
  pub title:         String,
  pub department_id: Uuid,
  /// Free-form seniority tag, e.g. "junior" or "L3".
  pub level:         String,
  pub min_salary:    f64,
  pub max_salary:    f64,
  pub description:   Option<String>,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJobRole {
  pub title:         String,
  pub department_id: Uuid,
  pub level:         String,
  pub min_salary:    f64,
  pub max_salary:    f64,
  pub description:   Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRolePatch {
  pub title:         Option<String>,
  pub department_id: Option<Uuid>,
  pub level:         Option<String>,
  pub min_salary:    Option<f64>,
  pub max_salary:    Option<f64>,
  pub description:   Option<String>,
}

/// Filters for [`crate::store::HrStore::list_job_roles`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRoleQuery {
  pub department_id: Option<Uuid>,
  pub level:         Option<String>,
}
