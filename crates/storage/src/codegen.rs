// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily-scoped unique code generation.
//!
//! Codes are derived from the codes already stored in a column: read the
//! highest suffix issued today, propose the next one, then verify nobody
//! holds it yet. This is read-then-verify, not a lock. Two callers can still
//! both see the same free candidate, so the writer of the owning record must
//! treat a unique violation on the code column as retriable; [`issue`]
//! packages that loop.
//!
//! [`issue`]: CodeGenerator::issue

use crate::{quote_ident, Store, StoreError};
use keel_core::code::validate_prefix;
use keel_core::{Clock, CodeFormatError, DateKey, UniqueCode};
use rusqlite::params;
use thiserror::Error;
use tracing::debug;

/// Attempts allowed before giving up under contention.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Errors from code generation
#[derive(Debug, Error)]
pub enum CodeError {
    #[error(transparent)]
    Format(#[from] CodeFormatError),
    #[error("no free {prefix} code for {date} after {attempts} attempts")]
    Exhausted {
        prefix: String,
        date: String,
        attempts: u32,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Table column holding issued codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeColumn {
    table: String,
    column: String,
}

impl CodeColumn {
    pub fn new(table: &str, column: &str) -> Result<Self, StoreError> {
        quote_ident(table)?;
        quote_ident(column)?;
        Ok(Self {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    /// Ticket numbers.
    pub fn tickets() -> Self {
        Self {
            table: "tickets".to_string(),
            column: "ticket_number".to_string(),
        }
    }
}

/// Issues `PREFIX-YYYYMMDD-NNN` codes unique within one column.
pub struct CodeGenerator<'a, C: Clock> {
    store: &'a Store,
    clock: C,
    target: CodeColumn,
    max_attempts: u32,
}

impl<'a, C: Clock> CodeGenerator<'a, C> {
    /// Generator for ticket numbers.
    pub fn new(store: &'a Store, clock: C) -> Self {
        Self {
            store,
            clock,
            target: CodeColumn::tickets(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn for_column(mut self, target: CodeColumn) -> Self {
        self.target = target;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Propose the next free code for `prefix` today.
    ///
    /// The caller persists it together with the owning record.
    pub fn next(&self, prefix: &str) -> Result<UniqueCode, CodeError> {
        validate_prefix(prefix)?;
        let date = DateKey::of(self.clock.now());
        let highest = self.highest_suffix(prefix, date)?;

        let mut candidate = UniqueCode::new(prefix, date, highest + 1)?;
        for _ in 0..self.max_attempts {
            if !self.is_taken(&candidate)? {
                return Ok(candidate);
            }
            debug!(code = %candidate, "candidate already taken, trying next");
            candidate = candidate.successor();
        }
        Err(self.exhausted(prefix, date))
    }

    /// Generate a code and persist it through `persist`, regenerating when
    /// the insert loses a race on the code column.
    ///
    /// Any error other than a unique violation is returned as-is.
    pub fn issue<T, F>(&self, prefix: &str, mut persist: F) -> Result<(UniqueCode, T), CodeError>
    where
        F: FnMut(&UniqueCode) -> Result<T, StoreError>,
    {
        for attempt in 1..=self.max_attempts {
            let code = self.next(prefix)?;
            match persist(&code) {
                Ok(value) => return Ok((code, value)),
                Err(e) if e.is_unique_violation() => {
                    debug!(code = %code, attempt, "code claimed concurrently, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(self.exhausted(prefix, DateKey::of(self.clock.now())))
    }

    fn highest_suffix(&self, prefix: &str, date: DateKey) -> Result<u64, StoreError> {
        let head = UniqueCode::series_head(prefix, date);
        let column = quote_ident(&self.target.column)?;
        // GLOB is case-sensitive, unlike LIKE
        let sql = format!(
            "SELECT MAX(CAST(substr({column}, ?1) AS INTEGER)) FROM {} WHERE {column} GLOB ?2",
            quote_ident(&self.target.table)?
        );
        let highest: Option<i64> = self.store.connection().query_row(
            &sql,
            params![head.len() as i64 + 1, format!("{head}[0-9]*")],
            |row| row.get(0),
        )?;
        Ok(highest.unwrap_or(0).max(0) as u64)
    }

    fn is_taken(&self, code: &UniqueCode) -> Result<bool, StoreError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
            quote_ident(&self.target.table)?,
            quote_ident(&self.target.column)?
        );
        let taken = self
            .store
            .connection()
            .query_row(&sql, params![code.to_string()], |row| row.get(0))?;
        Ok(taken)
    }

    fn exhausted(&self, prefix: &str, date: DateKey) -> CodeError {
        CodeError::Exhausted {
            prefix: prefix.to_string(),
            date: date.to_string(),
            attempts: self.max_attempts,
        }
    }
}

#[cfg(test)]
#[path = "codegen_tests.rs"]
mod tests;
