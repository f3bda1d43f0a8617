//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Every statement is scoped by the `kind` column so the
//! stores for different document kinds can share one database file.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    kind TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (kind, id)
);

CREATE INDEX IF NOT EXISTS idx_records_kind_created ON records(kind, created_at, id);

CREATE TABLE IF NOT EXISTS unique_keys (
    kind TEXT NOT NULL,
    field TEXT NOT NULL,
    value TEXT NOT NULL,
    record_id TEXT NOT NULL,
    PRIMARY KEY (kind, field, value)
);

CREATE INDEX IF NOT EXISTS idx_unique_keys_record ON unique_keys(kind, record_id);
"#;

pub const INSERT_RECORD: &str = r#"
INSERT INTO records (kind, id, body, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_RECORD_BY_ID: &str = r#"
SELECT id, body, created_at, updated_at
FROM records
WHERE kind = ?1 AND id = ?2
"#;

pub const SELECT_RECORDS_BY_KIND: &str = r#"
SELECT id, body, created_at, updated_at
FROM records
WHERE kind = ?1
ORDER BY created_at, id
"#;

pub const UPDATE_RECORD: &str = r#"
UPDATE records
SET body = ?3, updated_at = ?4
WHERE kind = ?1 AND id = ?2
"#;

pub const DELETE_RECORD: &str = r#"
DELETE FROM records
WHERE kind = ?1 AND id = ?2
"#;

pub const INSERT_UNIQUE_KEY: &str = r#"
INSERT INTO unique_keys (kind, field, value, record_id)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const DELETE_UNIQUE_KEYS: &str = r#"
DELETE FROM unique_keys
WHERE kind = ?1 AND record_id = ?2
"#;
