// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite store handle.
//!
//! One [`Store`] is opened per process invocation and passed by reference
//! into the ledger, runner, checker, reconciler and code generator. The
//! [`Executor`] trait is the narrow surface migrations see: run a statement
//! and check whether a schema object exists before creating it.

use crate::StoreError;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Throwaway table used to probe for schema-altering rights.
const PROBE_TABLE: &str = "__keel_permission_probe";

/// Kind of object recorded in `sqlite_master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaObject {
    Table,
    Index,
    Trigger,
    View,
}

impl SchemaObject {
    fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Index => "index",
            Self::Trigger => "trigger",
            Self::View => "view",
        }
    }
}

/// Statement execution and existence checks for migration actions.
pub trait Executor {
    /// Execute one or more `;`-separated statements.
    fn execute(&self, statement: &str) -> Result<(), StoreError>;

    fn object_exists(&self, kind: SchemaObject, name: &str) -> Result<bool, StoreError>;

    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError>;

    fn table_exists(&self, name: &str) -> Result<bool, StoreError> {
        self.object_exists(SchemaObject::Table, name)
    }

    fn index_exists(&self, name: &str) -> Result<bool, StoreError> {
        self.object_exists(SchemaObject::Index, name)
    }

    fn trigger_exists(&self, name: &str) -> Result<bool, StoreError> {
        self.object_exists(SchemaObject::Trigger, name)
    }

    fn view_exists(&self, name: &str) -> Result<bool, StoreError> {
        self.object_exists(SchemaObject::View, name)
    }
}

/// An open SQLite database.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
    read_only: bool,
}

impl Store {
    /// Open (or create) a database file for reading and writing.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!(path = %path.display(), journal_mode = %mode, "opened store");

        Ok(Self {
            conn,
            path: Some(path.to_owned()),
            read_only: false,
        })
    }

    /// Open an existing database file without write rights.
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(Self {
            conn,
            path: Some(path.to_owned()),
            read_only: true,
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self {
            conn,
            path: None,
            read_only: false,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Raw connection for parameterized queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Column names of `table` in declaration order; empty if it does not exist.
    pub fn columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let names = stmt
            .query_map(params![table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Verify the current principal may alter the schema.
    ///
    /// Creates and drops a throwaway table. Any failure that looks like a
    /// rights problem is reported as [`StoreError::PermissionDenied`] with
    /// remediation text instead of the raw driver error.
    pub fn probe_write_access(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::permission_denied(format!(
                "{} was opened read-only",
                self.describe()
            )));
        }

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {PROBE_TABLE} (id INTEGER); DROP TABLE {PROBE_TABLE};"
        );
        match self.conn.execute_batch(&sql) {
            Ok(()) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(failure, msg))
                if failure.code == rusqlite::ErrorCode::CannotOpen =>
            {
                Err(StoreError::permission_denied(format!(
                    "cannot write {}: {}",
                    self.describe(),
                    msg.unwrap_or_else(|| failure.to_string())
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Close the connection, surfacing any error the drop path would hide.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "in-memory database".to_string(),
        }
    }
}

impl Executor for Store {
    fn execute(&self, statement: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(statement)?;
        Ok(())
    }

    fn object_exists(&self, kind: SchemaObject, name: &str) -> Result<bool, StoreError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2)",
            params![kind.as_str(), name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2)",
            params![table, column],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
