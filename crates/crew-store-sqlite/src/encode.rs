//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order matches chronological order. Calendar dates are
//! stored as `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use crew_core::{
  attendance::AttendanceRecord,
  department::Department,
  job_role::JobRole,
  leave::LeaveRequest,
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

/// Parse a closed-enum column through the type's `FromStr`.
fn decode_enum<T>(column: &'static str, s: &str) -> Result<T>
where
  T: FromStr<Err = String>,
{
  s.parse().map_err(|reason| Error::Decode { column, reason })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, email, password_hash, name, role, status, \
  phone, address, department_id, position, salary, dob, dob_bs, join_date, \
  resignation_date, profile_image, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:               String,
  pub email:            String,
  pub password_hash:    String,
  pub name:             String,
  pub role:             String,
  pub status:           String,
  pub phone:            Option<String>,
  pub address:          Option<String>,
  pub department_id:    Option<String>,
  pub position:         Option<String>,
  pub salary:           Option<f64>,
  pub dob:              Option<String>,
  pub dob_bs:           Option<String>,
  pub join_date:        Option<String>,
  pub resignation_date: Option<String>,
  pub profile_image:    Option<String>,
  pub created_at:       String,
  pub updated_at:       Option<String>,
}

impl RawUser {
  /// Read a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      email:            row.get(1)?,
      password_hash:    row.get(2)?,
      name:             row.get(3)?,
      role:             row.get(4)?,
      status:           row.get(5)?,
      phone:            row.get(6)?,
      address:          row.get(7)?,
      department_id:    row.get(8)?,
      position:         row.get(9)?,
      salary:           row.get(10)?,
      dob:              row.get(11)?,
      dob_bs:           row.get(12)?,
      join_date:        row.get(13)?,
      resignation_date: row.get(14)?,
      profile_image:    row.get(15)?,
      created_at:       row.get(16)?,
      updated_at:       row.get(17)?,
    })
  }

  pub fn from_user(u: &User) -> Self {
    Self {
      id:               encode_uuid(u.id),
      email:            u.email.clone(),
      password_hash:    u.password_hash.clone(),
      name:             u.name.clone(),
      role:             u.role.as_str().to_owned(),
      status:           u.status.as_str().to_owned(),
      phone:            u.phone.clone(),
      address:          u.address.clone(),
      department_id:    u.department_id.map(encode_uuid),
      position:         u.position.clone(),
      salary:           u.salary,
      dob:              u.dob.map(encode_date),
      dob_bs:           u.dob_bs.clone(),
      join_date:        u.join_date.map(encode_date),
      resignation_date: u.resignation_date.map(encode_date),
      profile_image:    u.profile_image.clone(),
      created_at:       encode_dt(u.created_at),
      updated_at:       u.updated_at.map(encode_dt),
    }
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:               decode_uuid(&self.id)?,
      email:            self.email,
      password_hash:    self.password_hash,
      name:             self.name,
      role:             decode_enum("users.role", &self.role)?,
      status:           decode_enum("users.status", &self.status)?,
      phone:            self.phone,
      address:          self.address,
      department_id:    decode_opt_uuid(self.department_id)?,
      position:         self.position,
      salary:           self.salary,
      dob:              decode_opt_date(self.dob)?,
      dob_bs:           self.dob_bs,
      join_date:        decode_opt_date(self.join_date)?,
      resignation_date: decode_opt_date(self.resignation_date)?,
      profile_image:    self.profile_image,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_opt_dt(self.updated_at)?,
    })
  }
}

pub const DEPARTMENT_COLUMNS: &str =
  "id, name, description, head_of_department, created_at, updated_at";

pub struct RawDepartment {
  pub id:                 String,
  pub name:               String,
  pub description:        Option<String>,
  pub head_of_department: Option<String>,
  pub created_at:         String,
  pub updated_at:         Option<String>,
}

impl RawDepartment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      name:               row.get(1)?,
      description:        row.get(2)?,
      head_of_department: row.get(3)?,
      created_at:         row.get(4)?,
      updated_at:         row.get(5)?,
    })
  }

  pub fn into_department(self) -> Result<Department> {
    Ok(Department {
      id:                 decode_uuid(&self.id)?,
      name:               self.name,
      description:        self.description,
      head_of_department: self.head_of_department,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_opt_dt(self.updated_at)?,
    })
  }
}

pub const JOB_ROLE_COLUMNS: &str = "id, title, department_id, level, \
  min_salary, max_salary, description, created_at";

pub struct RawJobRole {
  pub id:            String,
  pub title:         String,
  pub department_id: String,
  pub level:         String,
  pub min_salary:    f64,
  pub max_salary:    f64,
  pub description:   Option<String>,
  pub created_at:    String,
}

impl RawJobRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      title:         row.get(1)?,
      department_id: row.get(2)?,
      level:         row.get(3)?,
      min_salary:    row.get(4)?,
      max_salary:    row.get(5)?,
      description:   row.get(6)?,
      created_at:    row.get(7)?,
    })
  }

  pub fn into_job_role(self) -> Result<JobRole> {
    Ok(JobRole {
      id:            decode_uuid(&self.id)?,
      title:         self.title,
      department_id: decode_uuid(&self.department_id)?,
      level:         self.level,
      min_salary:    self.min_salary,
      max_salary:    self.max_salary,
      description:   self.description,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const ATTENDANCE_COLUMNS: &str = "id, user_id, date, check_in, check_out, \
  status, late_reason, created_at";

pub struct RawAttendance {
  pub id:          i64,
  pub user_id:     String,
  pub date:        String,
  pub check_in:    String,
  pub check_out:   Option<String>,
  pub status:      String,
  pub late_reason: Option<String>,
  pub created_at:  String,
}

impl RawAttendance {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      user_id:     row.get(1)?,
      date:        row.get(2)?,
      check_in:    row.get(3)?,
      check_out:   row.get(4)?,
      status:      row.get(5)?,
      late_reason: row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      id:          self.id,
      user_id:     decode_uuid(&self.user_id)?,
      date:        decode_date(&self.date)?,
      check_in:    self.check_in,
      check_out:   self.check_out,
      status:      decode_enum("attendance.status", &self.status)?,
      late_reason: self.late_reason,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const LEAVE_COLUMNS: &str = "id, user_id, leave_type, start_date, end_date, \
  start_date_bs, end_date_bs, reason, half_day, status, approved_by, \
  approved_at, created_at, updated_at";

pub struct RawLeave {
  pub id:            String,
  pub user_id:       String,
  pub leave_type:    String,
  pub start_date:    String,
  pub end_date:      String,
  pub start_date_bs: Option<String>,
  pub end_date_bs:   Option<String>,
  pub reason:        String,
  pub half_day:      bool,
  pub status:        String,
  pub approved_by:   Option<String>,
  pub approved_at:   Option<String>,
  pub created_at:    String,
  pub updated_at:    Option<String>,
}

impl RawLeave {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      leave_type:    row.get(2)?,
      start_date:    row.get(3)?,
      end_date:      row.get(4)?,
      start_date_bs: row.get(5)?,
      end_date_bs:   row.get(6)?,
      reason:        row.get(7)?,
      half_day:      row.get(8)?,
      status:        row.get(9)?,
      approved_by:   row.get(10)?,
      approved_at:   row.get(11)?,
      created_at:    row.get(12)?,
      updated_at:    row.get(13)?,
    })
  }

  pub fn into_leave(self) -> Result<LeaveRequest> {
    Ok(LeaveRequest {
      id:            decode_uuid(&self.id)?,
      user_id:       decode_uuid(&self.user_id)?,
      leave_type:    self.leave_type,
      start_date:    decode_date(&self.start_date)?,
      end_date:      decode_date(&self.end_date)?,
      start_date_bs: self.start_date_bs,
      end_date_bs:   self.end_date_bs,
      reason:        self.reason,
      half_day:      self.half_day,
      status:        decode_enum("leaves.status", &self.status)?,
      approved_by:   decode_opt_uuid(self.approved_by)?,
      approved_at:   decode_opt_dt(self.approved_at)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_opt_dt(self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let early = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let later = early + chrono::Duration::milliseconds(1500);
    assert!(encode_dt(early) < encode_dt(later));
    assert_eq!(encode_dt(early).len(), encode_dt(later).len());
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn unknown_enum_value_is_a_decode_error() {
    let err = decode_enum::<crew_core::user::Role>("users.role", "superadmin")
      .unwrap_err();
    assert!(matches!(err, Error::Decode { column: "users.role", .. }));
  }
}
