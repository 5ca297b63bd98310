// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applied-migration ledger.
//!
//! One row per migration name recording the outcome, time and duration of
//! its last attempt. Retries overwrite the row, so a migration that failed
//! and was later fixed only shows its successful attempt.
//!
//! Older deployments kept this table with a different column set. `ensure`
//! detects that and copies the legacy rows into the current structure in a
//! single transaction before dropping the old table.

use crate::{quote_ident, Store, StoreError};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use keel_core::{Clock, MigrationRecord};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "schema_migrations";

/// Staging table used while upgrading a legacy ledger.
const STAGING_TABLE: &str = "schema_migrations_next";

const CURRENT_COLUMNS: [&str; 4] = ["name", "executed_at", "duration_ms", "succeeded"];

// Column names seen in legacy ledgers, in order of preference.
const NAME_COLUMNS: [&str; 3] = ["name", "migration", "version"];
const TIME_COLUMNS: [&str; 4] = ["executed_at", "applied_at", "run_on", "created_at"];
const DURATION_COLUMNS: [&str; 2] = ["duration_ms", "execution_time_ms"];
const OUTCOME_COLUMNS: [&str; 2] = ["succeeded", "success"];

/// Epoch values above this are taken to be milliseconds.
const EPOCH_MS_THRESHOLD: i64 = 100_000_000_000;

fn ledger_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (
            name TEXT PRIMARY KEY NOT NULL,
            executed_at TEXT NOT NULL,
            duration_ms INTEGER,
            succeeded INTEGER NOT NULL CHECK (succeeded IN (0, 1))
        );"
    )
}

/// What `ensure` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerState {
    /// The table did not exist and was created.
    Created,
    /// The table already had the expected structure.
    Current,
    /// A legacy table was copied into the current structure.
    Upgraded { rows: usize },
    /// A legacy table without a recognisable name column was renamed aside
    /// and a fresh ledger created.
    SetAside { legacy_table: String },
}

/// Legacy-to-current column mapping.
struct ColumnMap {
    name: String,
    executed_at: Option<String>,
    duration_ms: Option<String>,
    succeeded: Option<String>,
}

impl ColumnMap {
    fn detect(columns: &[String]) -> Option<Self> {
        let pick = |candidates: &[&str]| {
            candidates
                .iter()
                .find(|c| columns.iter().any(|col| col.eq_ignore_ascii_case(c)))
                .map(|c| c.to_string())
        };
        Some(Self {
            name: pick(&NAME_COLUMNS)?,
            executed_at: pick(&TIME_COLUMNS),
            duration_ms: pick(&DURATION_COLUMNS),
            succeeded: pick(&OUTCOME_COLUMNS),
        })
    }

    fn select_sql(&self) -> Result<String, StoreError> {
        let opt = |col: &Option<String>, default: &str| -> Result<String, StoreError> {
            match col {
                Some(c) => quote_ident(c),
                None => Ok(default.to_string()),
            }
        };
        Ok(format!(
            "SELECT {}, {}, {}, {} FROM {LEDGER_TABLE}",
            quote_ident(&self.name)?,
            opt(&self.executed_at, "NULL")?,
            opt(&self.duration_ms, "NULL")?,
            // Legacy ledgers without an outcome column only recorded successes
            opt(&self.succeeded, "1")?,
        ))
    }
}

/// Ledger of migration attempts.
pub struct Ledger<'a, C: Clock> {
    store: &'a Store,
    clock: C,
}

impl<'a, C: Clock> Ledger<'a, C> {
    pub fn new(store: &'a Store, clock: C) -> Self {
        Self { store, clock }
    }

    /// Create the ledger if absent, or upgrade a legacy structure in place.
    pub fn ensure(&self) -> Result<LedgerState, StoreError> {
        let columns = self.store.columns(LEDGER_TABLE)?;
        if columns.is_empty() {
            self.store
                .connection()
                .execute_batch(&ledger_ddl(LEDGER_TABLE))?;
            info!(table = LEDGER_TABLE, "created migration ledger");
            return Ok(LedgerState::Created);
        }

        let current = CURRENT_COLUMNS
            .iter()
            .all(|expected| columns.iter().any(|c| c == expected));
        if current {
            return Ok(LedgerState::Current);
        }

        warn!(
            table = LEDGER_TABLE,
            columns = ?columns,
            "migration ledger has an unexpected structure, upgrading",
        );
        self.upgrade(&columns)
    }

    fn upgrade(&self, columns: &[String]) -> Result<LedgerState, StoreError> {
        let conn = self.store.connection();
        let tx = conn.unchecked_transaction()?;

        let Some(map) = ColumnMap::detect(columns) else {
            let legacy_table = format!(
                "{LEDGER_TABLE}_legacy_{}",
                self.clock.now().format("%Y%m%d%H%M%S")
            );
            tx.execute_batch(&format!(
                "ALTER TABLE {LEDGER_TABLE} RENAME TO {legacy_table};\n{}",
                ledger_ddl(LEDGER_TABLE)
            ))?;
            tx.commit()?;
            warn!(
                legacy_table = %legacy_table,
                "legacy ledger has no migration name column, kept aside and started a fresh ledger",
            );
            return Ok(LedgerState::SetAside { legacy_table });
        };

        let records = self.read_with(&map)?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {STAGING_TABLE};\n{}",
            ledger_ddl(STAGING_TABLE)
        ))?;
        let mut copied = 0;
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {STAGING_TABLE} (name, executed_at, duration_ms, succeeded)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name) DO NOTHING"
            ))?;
            for record in &records {
                copied += insert.execute(params![
                    record.name,
                    format_timestamp(record.executed_at),
                    record.duration_ms.map(clamp_ms),
                    record.succeeded,
                ])?;
            }
        }
        tx.execute_batch(&format!(
            "DROP TABLE {LEDGER_TABLE};\nALTER TABLE {STAGING_TABLE} RENAME TO {LEDGER_TABLE};"
        ))?;
        tx.commit()?;

        info!(
            rows = copied,
            legacy_rows = records.len(),
            "upgraded migration ledger to current structure",
        );
        Ok(LedgerState::Upgraded { rows: copied })
    }

    /// True only if `name` has a row whose last attempt succeeded.
    pub fn is_applied(&self, name: &str) -> Result<bool, StoreError> {
        let succeeded: Option<bool> = self
            .store
            .connection()
            .query_row(
                &format!("SELECT succeeded FROM {LEDGER_TABLE} WHERE name = ?1"),
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(succeeded.unwrap_or(false))
    }

    /// Upsert the outcome of an attempt, overwriting any earlier attempt.
    pub fn record(&self, name: &str, duration_ms: u64, succeeded: bool) -> Result<(), StoreError> {
        self.store.connection().execute(
            &format!(
                "INSERT INTO {LEDGER_TABLE} (name, executed_at, duration_ms, succeeded)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name) DO UPDATE SET
                     executed_at = excluded.executed_at,
                     duration_ms = excluded.duration_ms,
                     succeeded = excluded.succeeded"
            ),
            params![
                name,
                format_timestamp(self.clock.now()),
                clamp_ms(duration_ms),
                succeeded
            ],
        )?;
        Ok(())
    }

    /// Row for one migration, if it was ever attempted.
    pub fn get(&self, name: &str) -> Result<Option<MigrationRecord>, StoreError> {
        Ok(self.records()?.into_iter().find(|r| r.name == name))
    }

    /// Every ledger row, oldest first.
    ///
    /// Reads through the legacy column mapping and never mutates the store,
    /// so it also works on ledgers `ensure` has not upgraded yet. A missing
    /// table reads as empty.
    pub fn records(&self) -> Result<Vec<MigrationRecord>, StoreError> {
        let columns = self.store.columns(LEDGER_TABLE)?;
        if columns.is_empty() {
            return Ok(Vec::new());
        }
        let Some(map) = ColumnMap::detect(&columns) else {
            warn!(columns = ?columns, "migration ledger has no readable name column");
            return Ok(Vec::new());
        };
        let mut records = self.read_with(&map)?;
        records.sort_by(|a, b| {
            a.executed_at
                .cmp(&b.executed_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(records)
    }

    /// Rows whose last attempt succeeded, oldest first.
    pub fn applied(&self) -> Result<Vec<MigrationRecord>, StoreError> {
        let mut records = self.records()?;
        records.retain(|r| r.succeeded);
        Ok(records)
    }

    fn read_with(&self, map: &ColumnMap) -> Result<Vec<MigrationRecord>, StoreError> {
        let now = self.clock.now();
        let mut stmt = self.store.connection().prepare(&map.select_sql()?)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, Value>(0)?,
                    row.get::<_, Value>(1)?,
                    row.get::<_, Value>(2)?,
                    row.get::<_, Value>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (name, executed_at, duration_ms, succeeded) in rows {
            let Some(name) = value_to_name(name) else {
                warn!("skipping ledger row without a migration name");
                continue;
            };
            records.push(MigrationRecord {
                name,
                executed_at: parse_timestamp(executed_at).unwrap_or(now),
                duration_ms: value_to_duration(duration_ms),
                succeeded: value_to_outcome(succeeded),
            });
        }
        Ok(records)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn clamp_ms(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

fn value_to_name(value: Value) -> Option<String> {
    match value {
        Value::Text(s) if !s.trim().is_empty() => Some(s),
        Value::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Text(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                        .ok()
                        .map(|naive| Utc.from_utc_datetime(&naive))
                })
        }
        Value::Integer(n) if n >= EPOCH_MS_THRESHOLD => DateTime::from_timestamp_millis(n),
        Value::Integer(n) => DateTime::from_timestamp(n, 0),
        _ => None,
    }
}

fn value_to_duration(value: Value) -> Option<u64> {
    match value {
        Value::Integer(n) => Some(n.max(0) as u64),
        Value::Real(f) if f.is_finite() => Some(f.max(0.0) as u64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_outcome(value: Value) -> bool {
    match value {
        Value::Integer(n) => n != 0,
        Value::Real(f) => f != 0.0,
        Value::Text(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "t" | "true" | "yes"
        ),
        // Unknown outcome: eligible for retry
        _ => false,
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
