//! Attendance records: at most one per user per calendar day.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
  Present,
  Late,
  Absent,
}

impl AttendanceStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Present => "present",
      Self::Late => "late",
      Self::Absent => "absent",
    }
  }
}

impl FromStr for AttendanceStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "present" => Ok(Self::Present),
      "late" => Ok(Self::Late),
      "absent" => Ok(Self::Absent),
      other => Err(format!("unknown attendance status: {other:?}")),
    }
  }
}

/// One day of attendance for one user.
///
/// `status` is asserted by whoever records it; lateness is never derived from
/// `check_in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub id:          i64,
  pub user_id:     Uuid,
  pub date:        NaiveDate,
  /// Wall-clock marker as entered, e.g. "09:05 AM".
  pub check_in:    String,
  pub check_out:   Option<String>,
  pub status:      AttendanceStatus,
  pub late_reason: Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendance {
  pub user_id:     Uuid,
  pub date:        NaiveDate,
  pub check_in:    String,
  pub check_out:   Option<String>,
  pub status:      AttendanceStatus,
  pub late_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendancePatch {
  pub check_out:   Option<String>,
  pub status:      Option<AttendanceStatus>,
  pub late_reason: Option<String>,
}

/// Filters for [`crate::store::HrStore::list_attendance`]. All filters are
/// applied before `limit`/`offset`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
  pub user_id:    Option<Uuid>,
  /// Inclusive lower bound.
  pub start_date: Option<NaiveDate>,
  /// Inclusive upper bound.
  pub end_date:   Option<NaiveDate>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}
