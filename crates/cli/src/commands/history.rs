// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel history`: every ledger row, oldest first.

use anyhow::Result;
use chrono::{DateTime, Utc};
use keel_core::{format_duration_ms, Clock, MigrationRecord, SystemClock};
use keel_storage::Ledger;

use super::{with_store, Access, Context};
use crate::color::Paint;
use crate::output::{format_time_ago, print_json, OutputFormat};
use crate::table::{CellStyle, Column, Table};

pub fn handle(ctx: &Context) -> Result<()> {
    let records = with_store(&ctx.config.database, Access::ReadOnly, |store| {
        Ok(Ledger::new(store, SystemClock).records()?)
    })?;

    match ctx.format {
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No migrations recorded");
            } else {
                print!("{}", history_table(&records, SystemClock.now(), ctx.paint).render());
            }
        }
        OutputFormat::Json => print_json(&records)?,
    }
    Ok(())
}

fn history_table(records: &[MigrationRecord], now: DateTime<Utc>, paint: Paint) -> Table {
    let mut table = Table::new(vec![
        Column::left("NAME"),
        Column::left("STATUS").styled(CellStyle::Status),
        Column::left("EXECUTED").styled(CellStyle::Muted),
        Column::right("DURATION"),
    ])
    .with_paint(paint);
    for record in records {
        table.row(vec![
            record.name.clone(),
            record.status().to_string(),
            format!(
                "{} ({})",
                record.executed_at.format("%Y-%m-%d %H:%M:%S"),
                format_time_ago(record.executed_at, now)
            ),
            record
                .duration_ms
                .map(format_duration_ms)
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
