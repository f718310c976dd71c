//! Leave requests and their approval workflow.
//!
//! A request is created `Pending` and moves to `Approved` or `Rejected`
//! exactly once. Resolved requests are terminal; re-opening means filing a new
//! request.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl LeaveStatus {
  pub fn is_terminal(self) -> bool { !matches!(self, Self::Pending) }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
      Self::Rejected => "rejected",
    }
  }
}

impl fmt::Display for LeaveStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LeaveStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(Self::Pending),
      "approved" => Ok(Self::Approved),
      "rejected" => Ok(Self::Rejected),
      other => Err(format!("unknown leave status: {other:?}")),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
  pub id:            Uuid,
  pub user_id:       Uuid,
  /// Free text: "sick", "casual", "annual", ...
  pub leave_type:    String,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  /// Secondary-calendar renderings, carried opaquely and never validated.
  pub start_date_bs: Option<String>,
  pub end_date_bs:   Option<String>,
  pub reason:        String,
  pub half_day:      bool,
  pub status:        LeaveStatus,
  /// The user who resolved the request; cleared if that user is deleted.
  pub approved_by:   Option<Uuid>,
  pub approved_at:   Option<DateTime<Utc>>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    Option<DateTime<Utc>>,
}

/// What a caller submits. The owner is always the caller and is therefore
/// not part of this type.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveApplication {
  pub leave_type:    String,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub start_date_bs: Option<String>,
  pub end_date_bs:   Option<String>,
  pub reason:        String,
  #[serde(default)]
  pub half_day:      bool,
}

/// Input to [`crate::store::HrStore::add_leave`].
#[derive(Debug, Clone)]
pub struct NewLeave {
  pub user_id:     Uuid,
  pub application: LeaveApplication,
}

/// The atomic effect of resolving a request.
#[derive(Debug, Clone, Copy)]
pub struct LeaveResolution {
  pub status:      LeaveStatus,
  pub approved_by: Uuid,
  pub approved_at: DateTime<Utc>,
}

/// Filters for [`crate::store::HrStore::list_leaves`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveQuery {
  pub user_id: Option<Uuid>,
  pub status:  Option<LeaveStatus>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}
