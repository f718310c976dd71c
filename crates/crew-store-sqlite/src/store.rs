//! [`SqliteStore`], the SQLite implementation of [`HrStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crew_core::{
  Conflict,
  attendance::{AttendancePatch, AttendanceQuery, AttendanceRecord, NewAttendance},
  department::{Department, DepartmentPatch, NewDepartment},
  job_role::{JobRole, JobRolePatch, JobRoleQuery, NewJobRole},
  leave::{LeaveQuery, LeaveRequest, LeaveResolution, LeaveStatus, NewLeave},
  store::HrStore,
  user::{NewUser, User, UserPatch},
};

use crate::{
  Error, Result,
  encode::{
    ATTENDANCE_COLUMNS, DEPARTMENT_COLUMNS, JOB_ROLE_COLUMNS, LEAVE_COLUMNS,
    RawAttendance, RawDepartment, RawJobRole, RawLeave, RawUser, USER_COLUMNS,
    encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Constraint classification ───────────────────────────────────────────────

/// The structural constraints whose violation carries domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
  Unique,
  ForeignKey,
}

fn violation(err: &tokio_rusqlite::Error) -> Option<Violation> {
  let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _)) =
    err
  else {
    return None;
  };
  if failure.code != rusqlite::ErrorCode::ConstraintViolation {
    return None;
  }
  match failure.extended_code {
    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(Violation::Unique),
    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Violation::ForeignKey),
    _ => None,
  }
}

/// Translate a constraint violation into its domain error; anything else stays
/// a database error.
fn constraint_error(
  err: tokio_rusqlite::Error,
  translate: impl FnOnce(Violation) -> crew_core::Error,
) -> Error {
  match violation(&err) {
    Some(v) => Error::Core(translate(v)),
    None => Error::Database(err),
  }
}

/// SQLite's "no limit" sentinel.
fn encode_limit(limit: Option<usize>) -> i64 {
  limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX))
}

fn encode_offset(offset: Option<usize>) -> i64 {
  offset.map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX))
}

/// Split a clearable patch field into "write this column" and the value to
/// write, where `Some(None)` writes NULL.
fn clearable<T>(field: Option<Option<T>>) -> (bool, Option<T>) {
  (field.is_some(), field.flatten())
}

// ─── Row lookups (run on the connection thread) ──────────────────────────────

fn select_user(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
      [id],
      RawUser::from_row,
    )
    .optional()
}

fn select_department(
  conn: &Connection,
  id: &str,
) -> rusqlite::Result<Option<RawDepartment>> {
  conn
    .query_row(
      &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = ?1"),
      [id],
      RawDepartment::from_row,
    )
    .optional()
}

fn select_job_role(
  conn: &Connection,
  id: &str,
) -> rusqlite::Result<Option<RawJobRole>> {
  conn
    .query_row(
      &format!("SELECT {JOB_ROLE_COLUMNS} FROM job_roles WHERE id = ?1"),
      [id],
      RawJobRole::from_row,
    )
    .optional()
}

fn select_attendance(
  conn: &Connection,
  id: i64,
) -> rusqlite::Result<Option<RawAttendance>> {
  conn
    .query_row(
      &format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?1"),
      [id],
      RawAttendance::from_row,
    )
    .optional()
}

fn select_leave(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawLeave>> {
  conn
    .query_row(
      &format!("SELECT {LEAVE_COLUMNS} FROM leaves WHERE id = ?1"),
      [id],
      RawLeave::from_row,
    )
    .optional()
}

/// Outcome of a department delete, decided on the connection thread so the
/// assignment count and the delete cannot interleave with another writer.
enum DepartmentDelete {
  Deleted,
  Missing,
  InUse(u64),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Crew store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted, and every
/// call is serialized onto its one background thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }
}

// ─── HrStore impl ────────────────────────────────────────────────────────────

impl HrStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let NewUser { email, password_hash, name, role, status, profile } = input;
    let user = User {
      id: Uuid::new_v4(),
      email,
      password_hash,
      name,
      role,
      status,
      phone: profile.phone,
      address: profile.address,
      department_id: profile.department_id,
      position: profile.position,
      salary: profile.salary,
      dob: profile.dob,
      dob_bs: profile.dob_bs,
      join_date: profile.join_date,
      resignation_date: None,
      profile_image: None,
      created_at: Utc::now(),
      updated_at: None,
    };

    let raw           = RawUser::from_user(&user);
    let email         = user.email.clone();
    let department_id = user.department_id;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO users ({USER_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18)"
          ),
          rusqlite::params![
            raw.id,
            raw.email,
            raw.password_hash,
            raw.name,
            raw.role,
            raw.status,
            raw.phone,
            raw.address,
            raw.department_id,
            raw.position,
            raw.salary,
            raw.dob,
            raw.dob_bs,
            raw.join_date,
            raw.resignation_date,
            raw.profile_image,
            raw.created_at,
            raw.updated_at,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        constraint_error(e, |v| match v {
          Violation::Unique => Conflict::DuplicateEmail(email).into(),
          Violation::ForeignKey => crew_core::Error::not_found(
            "department",
            department_id.map(|d| d.to_string()).unwrap_or_default(),
          ),
        })
      })?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_user(conn, &id_str)?))
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              [email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, email"
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>> {
    let id_str        = encode_uuid(id);
    let department_id = patch.department_id.flatten();
    let status        = patch.status.map(|s| s.as_str());
    let now           = encode_dt(Utc::now());

    let name                     = patch.name;
    let (set_phone, phone)       = clearable(patch.phone);
    let (set_address, address)   = clearable(patch.address);
    let (set_image, image)       = clearable(patch.profile_image);
    let (set_dept, department)   =
      clearable(patch.department_id.map(|d| d.map(encode_uuid)));
    let (set_position, position) = clearable(patch.position);
    let (set_salary, salary)     = clearable(patch.salary);
    let (set_resigned, resigned) =
      clearable(patch.resignation_date.map(|d| d.map(encode_date)));

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET
             name             = COALESCE(?2, name),
             status           = COALESCE(?3, status),
             updated_at       = ?4,
             phone            = CASE WHEN ?5  THEN ?6  ELSE phone END,
             address          = CASE WHEN ?7  THEN ?8  ELSE address END,
             profile_image    = CASE WHEN ?9  THEN ?10 ELSE profile_image END,
             department_id    = CASE WHEN ?11 THEN ?12 ELSE department_id END,
             position         = CASE WHEN ?13 THEN ?14 ELSE position END,
             salary           = CASE WHEN ?15 THEN ?16 ELSE salary END,
             resignation_date = CASE WHEN ?17 THEN ?18 ELSE resignation_date END
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            name,
            status,
            now,
            set_phone,
            phone,
            set_address,
            address,
            set_image,
            image,
            set_dept,
            department,
            set_position,
            position,
            set_salary,
            salary,
            set_resigned,
            resigned,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_user(conn, &id_str)?)
      })
      .await
      .map_err(|e| {
        constraint_error(e, |_| {
          crew_core::Error::not_found(
            "department",
            department_id.map(|d| d.to_string()).unwrap_or_default(),
          )
        })
      })?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id_str])? > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn count_users_in_department(&self, department_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(department_id);
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM users WHERE department_id = ?1",
          [id_str],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }

  // ── Departments ───────────────────────────────────────────────────────────

  async fn add_department(&self, input: NewDepartment) -> Result<Department> {
    let department = Department {
      id:                 Uuid::new_v4(),
      name:               input.name,
      description:        input.description,
      head_of_department: input.head_of_department,
      created_at:         Utc::now(),
      updated_at:         None,
    };

    let id_str      = encode_uuid(department.id);
    let name        = department.name.clone();
    let description = department.description.clone();
    let head        = department.head_of_department.clone();
    let at_str      = encode_dt(department.created_at);
    let conflict    = department.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO departments (id, name, description, head_of_department, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, description, head, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        constraint_error(e, |_| Conflict::DuplicateDepartment(conflict).into())
      })?;

    Ok(department)
  }

  async fn get_department(&self, id: Uuid) -> Result<Option<Department>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_department(conn, &id_str)?))
      .await?;
    raw.map(RawDepartment::into_department).transpose()
  }

  async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>> {
    let name = name.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE name = ?1"),
              [name],
              RawDepartment::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawDepartment::into_department).transpose()
  }

  async fn list_departments(&self) -> Result<Vec<Department>> {
    let raws: Vec<RawDepartment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], RawDepartment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawDepartment::into_department).collect()
  }

  async fn update_department(
    &self,
    id: Uuid,
    patch: DepartmentPatch,
  ) -> Result<Option<Department>> {
    let id_str   = encode_uuid(id);
    let now      = encode_dt(Utc::now());
    let conflict = patch.name.clone().unwrap_or_default();

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE departments SET
             name               = COALESCE(?2, name),
             description        = COALESCE(?3, description),
             head_of_department = COALESCE(?4, head_of_department),
             updated_at         = ?5
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            patch.name,
            patch.description,
            patch.head_of_department,
            now,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_department(conn, &id_str)?)
      })
      .await
      .map_err(|e| {
        constraint_error(e, |_| Conflict::DuplicateDepartment(conflict).into())
      })?;

    raw.map(RawDepartment::into_department).transpose()
  }

  async fn delete_department(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if select_department(&tx, &id_str)?.is_none() {
          return Ok(DepartmentDelete::Missing);
        }
        let assigned: i64 = tx.query_row(
          "SELECT COUNT(*) FROM users WHERE department_id = ?1",
          [&id_str],
          |r| r.get(0),
        )?;
        if assigned > 0 {
          return Ok(DepartmentDelete::InUse(assigned as u64));
        }
        tx.execute("DELETE FROM departments WHERE id = ?1", [&id_str])?;
        tx.commit()?;
        Ok(DepartmentDelete::Deleted)
      })
      .await?;

    match outcome {
      DepartmentDelete::Deleted => Ok(true),
      DepartmentDelete::Missing => Ok(false),
      DepartmentDelete::InUse(assigned) => {
        Err(Conflict::DepartmentInUse { id, assigned }.into())
      }
    }
  }

  // ── Job roles ─────────────────────────────────────────────────────────────

  async fn add_job_role(&self, input: NewJobRole) -> Result<JobRole> {
    let role = JobRole {
      id:            Uuid::new_v4(),
      title:         input.title,
      department_id: input.department_id,
      level:         input.level,
      min_salary:    input.min_salary,
      max_salary:    input.max_salary,
      description:   input.description,
      created_at:    Utc::now(),
    };

    let id_str      = encode_uuid(role.id);
    let title       = role.title.clone();
    let dept_str    = encode_uuid(role.department_id);
    let level       = role.level.clone();
    let (min, max)  = (role.min_salary, role.max_salary);
    let description = role.description.clone();
    let at_str      = encode_dt(role.created_at);
    let department  = role.department_id;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO job_roles ({JOB_ROLE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
          ),
          rusqlite::params![
            id_str, title, dept_str, level, min, max, description, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        constraint_error(e, |_| crew_core::Error::not_found("department", department))
      })?;

    Ok(role)
  }

  async fn get_job_role(&self, id: Uuid) -> Result<Option<JobRole>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_job_role(conn, &id_str)?))
      .await?;
    raw.map(RawJobRole::into_job_role).transpose()
  }

  async fn list_job_roles(&self, query: &JobRoleQuery) -> Result<Vec<JobRole>> {
    let dept_str = query.department_id.map(encode_uuid);
    let level    = query.level.clone();

    let raws: Vec<RawJobRole> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {JOB_ROLE_COLUMNS} FROM job_roles
           WHERE (?1 IS NULL OR department_id = ?1)
             AND (?2 IS NULL OR level = ?2)
           ORDER BY title, created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![dept_str, level], RawJobRole::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawJobRole::into_job_role).collect()
  }

  async fn update_job_role(
    &self,
    id: Uuid,
    patch: JobRolePatch,
  ) -> Result<Option<JobRole>> {
    let id_str     = encode_uuid(id);
    let dept_str   = patch.department_id.map(encode_uuid);
    let department = patch.department_id;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE job_roles SET
             title         = COALESCE(?2, title),
             department_id = COALESCE(?3, department_id),
             level         = COALESCE(?4, level),
             min_salary    = COALESCE(?5, min_salary),
             max_salary    = COALESCE(?6, max_salary),
             description   = COALESCE(?7, description)
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            patch.title,
            dept_str,
            patch.level,
            patch.min_salary,
            patch.max_salary,
            patch.description,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_job_role(conn, &id_str)?)
      })
      .await
      .map_err(|e| {
        constraint_error(e, |_| {
          crew_core::Error::not_found(
            "department",
            department.map(|d| d.to_string()).unwrap_or_default(),
          )
        })
      })?;

    raw.map(RawJobRole::into_job_role).transpose()
  }

  async fn delete_job_role(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM job_roles WHERE id = ?1", [id_str])? > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn add_attendance(&self, input: NewAttendance) -> Result<AttendanceRecord> {
    let created_at  = Utc::now();
    let user_str    = encode_uuid(input.user_id);
    let date_str    = encode_date(input.date);
    let check_in    = input.check_in.clone();
    let check_out   = input.check_out.clone();
    let status      = input.status.as_str();
    let late_reason = input.late_reason.clone();
    let at_str      = encode_dt(created_at);
    let (user_id, date) = (input.user_id, input.date);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attendance
             (user_id, date, check_in, check_out, status, late_reason, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            user_str, date_str, check_in, check_out, status, late_reason, at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| {
        constraint_error(e, |v| match v {
          Violation::Unique => Conflict::DuplicateAttendance { user_id, date }.into(),
          Violation::ForeignKey => crew_core::Error::not_found("user", user_id),
        })
      })?;

    Ok(AttendanceRecord {
      id,
      user_id:     input.user_id,
      date:        input.date,
      check_in:    input.check_in,
      check_out:   input.check_out,
      status:      input.status,
      late_reason: input.late_reason,
      created_at,
    })
  }

  async fn get_attendance(&self, id: i64) -> Result<Option<AttendanceRecord>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_attendance(conn, id)?))
      .await?;
    raw.map(RawAttendance::into_record).transpose()
  }

  async fn find_attendance(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<AttendanceRecord>> {
    let user_str = encode_uuid(user_id);
    let date_str = encode_date(date);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ATTENDANCE_COLUMNS} FROM attendance
                 WHERE user_id = ?1 AND date = ?2"
              ),
              [user_str, date_str],
              RawAttendance::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAttendance::into_record).transpose()
  }

  async fn list_attendance(
    &self,
    query: &AttendanceQuery,
  ) -> Result<Vec<AttendanceRecord>> {
    let user_str  = query.user_id.map(encode_uuid);
    let start_str = query.start_date.map(encode_date);
    let end_str   = query.end_date.map(encode_date);
    let limit     = encode_limit(query.limit);
    let offset    = encode_offset(query.offset);

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ATTENDANCE_COLUMNS} FROM attendance
           WHERE (?1 IS NULL OR user_id = ?1)
             AND (?2 IS NULL OR date >= ?2)
             AND (?3 IS NULL OR date <= ?3)
           ORDER BY date DESC, id DESC
           LIMIT ?4 OFFSET ?5"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![user_str, start_str, end_str, limit, offset],
            RawAttendance::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  async fn update_attendance(
    &self,
    id: i64,
    patch: AttendancePatch,
  ) -> Result<Option<AttendanceRecord>> {
    let status = patch.status.map(|s| s.as_str());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE attendance SET
             check_out   = COALESCE(?2, check_out),
             status      = COALESCE(?3, status),
             late_reason = COALESCE(?4, late_reason)
           WHERE id = ?1",
          rusqlite::params![id, patch.check_out, status, patch.late_reason],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_attendance(conn, id)?)
      })
      .await?;
    raw.map(RawAttendance::into_record).transpose()
  }

  async fn delete_attendance(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM attendance WHERE id = ?1", [id])? > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Leave requests ────────────────────────────────────────────────────────

  async fn add_leave(&self, input: NewLeave) -> Result<LeaveRequest> {
    let NewLeave { user_id, application } = input;
    let leave = LeaveRequest {
      id: Uuid::new_v4(),
      user_id,
      leave_type: application.leave_type,
      start_date: application.start_date,
      end_date: application.end_date,
      start_date_bs: application.start_date_bs,
      end_date_bs: application.end_date_bs,
      reason: application.reason,
      half_day: application.half_day,
      status: LeaveStatus::Pending,
      approved_by: None,
      approved_at: None,
      created_at: Utc::now(),
      updated_at: None,
    };

    let id_str     = encode_uuid(leave.id);
    let user_str   = encode_uuid(leave.user_id);
    let leave_type = leave.leave_type.clone();
    let start_str  = encode_date(leave.start_date);
    let end_str    = encode_date(leave.end_date);
    let start_bs   = leave.start_date_bs.clone();
    let end_bs     = leave.end_date_bs.clone();
    let reason     = leave.reason.clone();
    let half_day   = leave.half_day;
    let at_str     = encode_dt(leave.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO leaves (
             id, user_id, leave_type, start_date, end_date, start_date_bs,
             end_date_bs, reason, half_day, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', ?10)",
          rusqlite::params![
            id_str, user_str, leave_type, start_str, end_str, start_bs, end_bs,
            reason, half_day, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        constraint_error(e, |_| crew_core::Error::not_found("user", user_id))
      })?;

    Ok(leave)
  }

  async fn get_leave(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_leave(conn, &id_str)?))
      .await?;
    raw.map(RawLeave::into_leave).transpose()
  }

  async fn list_leaves(&self, query: &LeaveQuery) -> Result<Vec<LeaveRequest>> {
    let user_str = query.user_id.map(encode_uuid);
    let status   = query.status.map(|s| s.as_str());
    let limit    = encode_limit(query.limit);
    let offset   = encode_offset(query.offset);

    let raws: Vec<RawLeave> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LEAVE_COLUMNS} FROM leaves
           WHERE (?1 IS NULL OR user_id = ?1)
             AND (?2 IS NULL OR status = ?2)
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![user_str, status, limit, offset],
            RawLeave::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawLeave::into_leave).collect()
  }

  async fn resolve_leave(
    &self,
    id: Uuid,
    resolution: LeaveResolution,
  ) -> Result<Option<LeaveRequest>> {
    let id_str       = encode_uuid(id);
    let status       = resolution.status.as_str();
    let approver_str = encode_uuid(resolution.approved_by);
    let at_str       = encode_dt(resolution.approved_at);

    let raw = self
      .conn
      .call(move |conn| {
        // The status predicate makes the transition single-shot.
        let changed = conn.execute(
          "UPDATE leaves SET
             status      = ?2,
             approved_by = ?3,
             approved_at = ?4,
             updated_at  = ?4
           WHERE id = ?1 AND status = 'pending'",
          rusqlite::params![id_str, status, approver_str, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_leave(conn, &id_str)?)
      })
      .await?;
    raw.map(RawLeave::into_leave).transpose()
  }

  async fn delete_leave(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM leaves WHERE id = ?1", [id_str])? > 0)
      })
      .await?;
    Ok(deleted)
  }
}
