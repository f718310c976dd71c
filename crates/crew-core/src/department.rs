//! Departments. The name is the human-facing uniqueness key; users reference
//! a department by its id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
  pub id:                 Uuid,
  pub name:               String,
  pub description:        Option<String>,
  pub head_of_department: Option<String>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
  pub name:               String,
  pub description:        Option<String>,
  pub head_of_department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentPatch {
  pub name:               Option<String>,
  pub description:        Option<String>,
  pub head_of_department: Option<String>,
}
