use rusqlite::ffi;
use thiserror::Error;

/// Failures surfaced by the storage layer. Constraint violations coming back
/// from SQLite are sorted into `Uniqueness`/`Integrity` by extended error
/// code so callers can show a sensible message instead of a raw SQL error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    Uniqueness(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, ref msg) = err {
            let detail = msg.clone().unwrap_or_else(|| e.to_string());
            match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return StoreError::Uniqueness(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                | ffi::SQLITE_CONSTRAINT_CHECK
                | ffi::SQLITE_CONSTRAINT_NOTNULL
                | ffi::SQLITE_CONSTRAINT_TRIGGER => {
                    return StoreError::Integrity(detail);
                }
                _ => {}
            }
        }
        StoreError::Sqlite(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_uniqueness() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('x');")
            .unwrap();
        let err: StoreError = conn
            .execute("INSERT INTO t VALUES ('x')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::Uniqueness(_)));
    }

    #[test]
    fn fk_violation_maps_to_integrity() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE p (id INTEGER PRIMARY KEY);
             CREATE TABLE c (p_id INTEGER REFERENCES p(id));",
        )
        .unwrap();
        let err: StoreError = conn
            .execute("INSERT INTO c VALUES (99)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::Integrity(_)));
    }
}
