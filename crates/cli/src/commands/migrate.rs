// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel migrate`: run pending migrations without backup or verification.

use std::fmt::Write as _;

use anyhow::Result;
use keel_core::SystemClock;
use keel_engine::{builtin_registry, MigrationRunner, RunSummary};

use super::{with_store, Access, Context};
use crate::color::Paint;
use crate::output::{print_json, OutputFormat};

pub fn handle(ctx: &Context) -> Result<()> {
    let registry = builtin_registry()?;
    let summary = with_store(&ctx.config.database, Access::ReadWrite, |store| {
        Ok(MigrationRunner::new(store, &registry, SystemClock).run()?)
    })?;

    match ctx.format {
        OutputFormat::Text => print!("{}", format_summary(&summary, ctx.paint)),
        OutputFormat::Json => print_json(&summary)?,
    }
    Ok(())
}

fn format_summary(summary: &RunSummary, paint: Paint) -> String {
    if summary.is_up_to_date() {
        return format!(
            "Already up to date ({} migration(s) applied)\n",
            summary.skipped.len()
        );
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} migration(s)",
        paint.status("applied"),
        summary.applied_count()
    );
    for name in &summary.applied {
        let _ = writeln!(out, "  {name}");
    }
    out
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;
