//! Operation history: SQLite-backed record of what was done to which site.
//!
//! Stored at `<store_dir>/history.db`, next to the parameter store. Only
//! operation names, site names and short non-secret details are written:
//! never master secrets, seeds or passwords.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{Result, SitepassError};

/// File name of the history database.
const DB_FILE: &str = "history.db";

/// A single history entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub site: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed history log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the history database in `dir`.
    ///
    /// Returns `None` if the database can't be opened; callers treat this
    /// as "history unavailable" and continue normally.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = Connection::open(&db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                site        TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget: errors are silently ignored.
    pub fn log(&self, operation: &str, site: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO history (timestamp, operation, site, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, site, details],
        );
    }

    /// Query recent entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_str = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, site, details
                 FROM history
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| SitepassError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    site: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| SitepassError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| SitepassError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Path of the history database inside `dir`.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join(DB_FILE)
    }
}

/// Directory holding the history for the store at `store_path`.
pub fn history_dir(store_path: &Path) -> PathBuf {
    match store_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Log an event next to the store at `store_path`.
///
/// Never fails the parent operation.
pub fn log_audit(store_path: &Path, op: &str, site: Option<&str>, details: Option<&str>) {
    let dir = history_dir(store_path);
    if !dir.is_dir() {
        return;
    }
    if let Some(audit) = AuditLog::open(&dir) {
        audit.log(op, site, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path());
        assert!(audit.is_some(), "should open successfully");
        assert!(dir.path().join("history.db").exists());
    }

    #[test]
    fn log_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("new", Some("example.com"), Some("ans, 20 chars"));
        audit.log("show", Some("example.com"), None);
        audit.log("check", None, None);

        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].operation, "check");
        assert!(entries[0].site.is_none());
        assert_eq!(entries[1].operation, "show");
        assert_eq!(entries[2].operation, "new");
        assert_eq!(entries[2].details.as_deref(), Some("ans, 20 chars"));
    }

    #[test]
    fn query_with_limit() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        for i in 0..10 {
            audit.log("show", Some(&format!("site-{i}")), None);
        }

        let entries = audit.query(3, None).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].site.as_deref(), Some("site-9"));
    }

    #[test]
    fn query_with_since_filter() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("new", Some("example.com"), None);

        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(audit.query(10, Some(past)).unwrap().len(), 1);

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(audit.query(10, Some(future)).unwrap().is_empty());
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        let result = AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_none());
    }

    #[test]
    fn history_dir_of_bare_file_name_is_cwd() {
        assert_eq!(history_dir(Path::new("sites.csv")), PathBuf::from("."));
        assert_eq!(
            history_dir(Path::new("/data/sites.csv")),
            PathBuf::from("/data")
        );
    }

    #[test]
    fn log_audit_writes_next_to_store() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("sites.csv");

        log_audit(&store, "new", Some("example.com"), None);

        let audit = AuditLog::open(dir.path()).unwrap();
        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].site.as_deref(), Some("example.com"));
    }

    #[cfg(unix)]
    #[test]
    fn history_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let perms = std::fs::metadata(dir.path().join("history.db"))
            .unwrap()
            .permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
