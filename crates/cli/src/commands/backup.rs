// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel backup`: take a snapshot now, whatever the migration state.

use anyhow::{bail, Result};
use keel_core::SystemClock;
use keel_storage::{Backup, BackupCoordinator};

use super::{with_store, Access, Context};
use crate::color::Paint;
use crate::output::{format_bytes, print_json, OutputFormat};

pub fn handle(ctx: &Context) -> Result<()> {
    let database = &ctx.config.database;
    if !database.is_file() {
        bail!("database not found: {}", database.display());
    }
    let config = &ctx.config.backup;
    let coordinator = BackupCoordinator::new(&config.dir, SystemClock)
        .keep(config.keep)
        .compress(config.compress);

    let backup = with_store(database, Access::ReadWrite, |store| {
        Ok(coordinator.snapshot(store)?)
    })?;

    match ctx.format {
        OutputFormat::Text => print!("{}", format_backup(&backup, ctx.paint)),
        OutputFormat::Json => print_json(&backup)?,
    }
    Ok(())
}

fn format_backup(backup: &Backup, paint: Paint) -> String {
    format!(
        "{} {} ({})\n  {}\n",
        paint.status("created"),
        backup.id,
        format_bytes(backup.size_bytes),
        paint.muted(&backup.path.display().to_string())
    )
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
