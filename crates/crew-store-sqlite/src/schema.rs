//! SQL schema for the Crew SQLite store.
//!
//! Executed once at connection startup. `PRAGMA foreign_keys` is per
//! connection, which is why the store owns exactly one.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departments (
    id                 TEXT PRIMARY KEY,
    name               TEXT NOT NULL UNIQUE,
    description        TEXT,
    head_of_department TEXT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT
);

CREATE TABLE IF NOT EXISTS users (
    id               TEXT PRIMARY KEY,
    email            TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash    TEXT NOT NULL,
    name             TEXT NOT NULL,
    role             TEXT NOT NULL CHECK (role IN ('top_admin', 'hr', 'employee')),
    status           TEXT NOT NULL CHECK (status IN ('active', 'deactivated', 'resigned')),
    phone            TEXT,
    address          TEXT,
    department_id    TEXT REFERENCES departments(id) ON DELETE RESTRICT,
    position         TEXT,
    salary           REAL,
    dob              TEXT,             -- YYYY-MM-DD
    dob_bs           TEXT,             -- secondary calendar, opaque
    join_date        TEXT,
    resignation_date TEXT,
    profile_image    TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT
);

CREATE TABLE IF NOT EXISTS job_roles (
    id            TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    department_id TEXT NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    level         TEXT NOT NULL,
    min_salary    REAL NOT NULL,
    max_salary    REAL NOT NULL,
    description   TEXT,
    created_at    TEXT NOT NULL,
    CHECK (min_salary <= max_salary)
);

CREATE TABLE IF NOT EXISTS attendance (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date        TEXT NOT NULL,
    check_in    TEXT NOT NULL,
    check_out   TEXT,
    status      TEXT NOT NULL CHECK (status IN ('present', 'late', 'absent')),
    late_reason TEXT,
    created_at  TEXT NOT NULL,
    UNIQUE (user_id, date)
);

CREATE TABLE IF NOT EXISTS leaves (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    leave_type    TEXT NOT NULL,
    start_date    TEXT NOT NULL,
    end_date      TEXT NOT NULL,
    start_date_bs TEXT,
    end_date_bs   TEXT,
    reason        TEXT NOT NULL,
    half_day      INTEGER NOT NULL DEFAULT 0,
    status        TEXT NOT NULL DEFAULT 'pending'
                  CHECK (status IN ('pending', 'approved', 'rejected')),
    approved_by   TEXT REFERENCES users(id) ON DELETE SET NULL,
    approved_at   TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT
);

CREATE INDEX IF NOT EXISTS users_department_idx   ON users(department_id);
CREATE INDEX IF NOT EXISTS job_roles_dept_idx     ON job_roles(department_id);
CREATE INDEX IF NOT EXISTS attendance_date_idx    ON attendance(date);
CREATE INDEX IF NOT EXISTS leaves_user_idx        ON leaves(user_id);
CREATE INDEX IF NOT EXISTS leaves_status_idx      ON leaves(status);
CREATE INDEX IF NOT EXISTS leaves_approved_by_idx ON leaves(approved_by);

PRAGMA user_version = 1;
";
