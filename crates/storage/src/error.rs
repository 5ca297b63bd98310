// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error taxonomy.
//!
//! Raw driver errors are classified on conversion so callers can match on
//! the conditions they are expected to handle: a unique violation on a code
//! column is retriable, a permission failure carries remediation text.

use rusqlite::ffi;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Remediation shown when the executing principal cannot alter the schema.
pub(crate) const WRITE_REMEDIATION: &str = "grant the deploying user write access to the \
     database file and its directory (for example `chown <deploy-user> <db> <db-dir>` or \
     `chmod u+w <db>`), and make sure the database is not opened read-only";

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[source] rusqlite::Error),
    #[error("unique constraint violated: {message}")]
    UniqueViolation { message: String },
    #[error("permission denied: {message}\n  hint: {remediation}")]
    PermissionDenied {
        message: String,
        remediation: String,
    },
    #[error("invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("unknown counter '{0}'")]
    UnknownCounter(String),
    #[error("{table}.{column} is at the largest possible id; counter '{counter}' cannot advance")]
    IdOverflow {
        table: String,
        column: String,
        counter: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    pub(crate) fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
            remediation: WRITE_REMEDIATION.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let rusqlite::Error::SqliteFailure(failure, _) = &err else {
            return Self::Sqlite(err);
        };
        match failure.code {
            ErrorCode::ConstraintViolation
                if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Self::UniqueViolation {
                    message: err.to_string(),
                }
            }
            ErrorCode::ReadOnly
            | ErrorCode::PermissionDenied
            | ErrorCode::AuthorizationForStatementDenied => Self::permission_denied(err.to_string()),
            _ => Self::Sqlite(err),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
