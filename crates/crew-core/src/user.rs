//! Users, the identities that authenticate against the system.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The access category of a user. This is the only representation of a role
/// anywhere in the system; no comparison is ever made against raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  TopAdmin,
  Hr,
  Employee,
}

impl Role {
  /// Roles allowed to manage other people's records.
  pub const PRIVILEGED: &'static [Role] = &[Role::Hr, Role::TopAdmin];

  /// The single role allowed to delete departments, job roles and attendance.
  pub const TOP_ADMIN_ONLY: &'static [Role] = &[Role::TopAdmin];

  pub fn is_privileged(self) -> bool { Self::PRIVILEGED.contains(&self) }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::TopAdmin => "top_admin",
      Self::Hr => "hr",
      Self::Employee => "employee",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "top_admin" => Ok(Self::TopAdmin),
      "hr" => Ok(Self::Hr),
      "employee" => Ok(Self::Employee),
      other => Err(format!("unknown role: {other:?}")),
    }
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of an account. Only `Active` accounts pass the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
  #[default]
  Active,
  Deactivated,
  Resigned,
}

impl UserStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Deactivated => "deactivated",
      Self::Resigned => "resigned",
    }
  }
}

impl FromStr for UserStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(Self::Active),
      "deactivated" => Ok(Self::Deactivated),
      "resigned" => Ok(Self::Resigned),
      other => Err(format!("unknown user status: {other:?}")),
    }
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A registered person. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:               Uuid,
  pub email:            String,
  #[serde(skip_serializing, default)]
  pub password_hash:    String,
  pub name:             String,
  pub role:             Role,
  pub status:           UserStatus,
  pub phone:            Option<String>,
  pub address:          Option<String>,
  /// Foreign key into `departments`; never a department name.
  pub department_id:    Option<Uuid>,
  pub position:         Option<String>,
  pub salary:           Option<f64>,
  pub dob:              Option<NaiveDate>,
  /// Date of birth in the secondary (Bikram Sambat) calendar, stored as-is.
  pub dob_bs:           Option<String>,
  pub join_date:        Option<NaiveDate>,
  pub resignation_date: Option<NaiveDate>,
  pub profile_image:    Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       Option<DateTime<Utc>>,
}

/// Optional profile fields shared by every way of creating a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
  pub phone:         Option<String>,
  pub address:       Option<String>,
  pub department_id: Option<Uuid>,
  pub position:      Option<String>,
  pub salary:        Option<f64>,
  pub dob:           Option<NaiveDate>,
  pub dob_bs:        Option<String>,
  pub join_date:     Option<NaiveDate>,
}

/// Input to [`crate::store::HrStore::add_user`]. The password must already be
/// hashed; `id` and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub password_hash: String,
  pub name:          String,
  pub role:          Role,
  pub status:        UserStatus,
  pub profile:       Profile,
}

/// Read a present field, `null` included, as `Some`. Paired with
/// `#[serde(default)]` an absent field stays `None`.
/// Canonical form of an email address: trimmed and lowercased. Lookups and
/// the uniqueness check both go through it.
pub fn normalize_email(raw: &str) -> String { raw.trim().to_lowercase() }

fn present<'de, D, T>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

/// A partial update.
///
/// `None` leaves the column untouched. For the nullable columns,
/// `Some(None)` (a JSON `null`) clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
  pub name:             Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub phone:            Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub address:          Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub profile_image:    Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub department_id:    Option<Option<Uuid>>,
  #[serde(default, deserialize_with = "present")]
  pub position:         Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub salary:           Option<Option<f64>>,
  pub status:           Option<UserStatus>,
  #[serde(default, deserialize_with = "present")]
  pub resignation_date: Option<Option<NaiveDate>>,
}

impl UserPatch {
  /// Whether the patch touches fields only HR or the top admin may change.
  pub fn touches_employment(&self) -> bool {
    self.department_id.is_some()
      || self.position.is_some()
      || self.salary.is_some()
      || self.status.is_some()
      || self.resignation_date.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn emails_compare_without_case_or_padding() {
    assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
  }

  #[test]
  fn role_round_trips_through_its_column_form() {
    for role in [Role::TopAdmin, Role::Hr, Role::Employee] {
      assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
    assert!("superadmin".parse::<Role>().is_err());
  }

  #[test]
  fn only_hr_and_top_admin_are_privileged() {
    assert!(Role::TopAdmin.is_privileged());
    assert!(Role::Hr.is_privileged());
    assert!(!Role::Employee.is_privileged());
  }

  #[test]
  fn self_service_patch_is_not_employment() {
    let patch = UserPatch { name: Some("New".into()), ..Default::default() };
    assert!(!patch.touches_employment());

    let patch = UserPatch { salary: Some(Some(1.0)), ..Default::default() };
    assert!(patch.touches_employment());

    // Clearing a department is still an employment change.
    let patch = UserPatch { department_id: Some(None), ..Default::default() };
    assert!(patch.touches_employment());
  }

  #[test]
  fn null_clears_but_absence_does_not() {
    let patch: UserPatch =
      serde_json::from_str(r#"{"department_id": null, "phone": "555"}"#).unwrap();
    assert_eq!(patch.department_id, Some(None));
    assert_eq!(patch.phone, Some(Some("555".to_owned())));
    assert_eq!(patch.position, None);
    assert_eq!(patch.salary, None);
  }
}
