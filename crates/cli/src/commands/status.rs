// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel status`: read-only readiness report.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use keel_core::{ReadinessReport, SystemClock};
use keel_engine::{builtin_registry, ReadinessChecker};

use super::{with_store, Access, Context};
use crate::color::Paint;
use crate::exit_error::{ExitError, EXIT_NOT_READY};
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// Exit with status 3 when migrations are pending
    #[arg(long)]
    pub check: bool,
}

pub fn handle(args: StatusArgs, ctx: &Context) -> Result<()> {
    let registry = builtin_registry()?;
    let report = with_store(&ctx.config.database, Access::ReadOnly, |store| {
        Ok(ReadinessChecker::new(store, &registry, SystemClock).check()?)
    })?;

    match ctx.format {
        OutputFormat::Text => print!(
            "{}",
            format_report(&report, &ctx.config.database, ctx.paint)
        ),
        OutputFormat::Json => print_json(&report)?,
    }

    if args.check && !report.is_ready {
        return Err(ExitError::silent(EXIT_NOT_READY).into());
    }
    Ok(())
}

fn format_report(report: &ReadinessReport, database: &Path, paint: Paint) -> String {
    let mut out = String::new();
    let state = if report.is_ready { "ready" } else { "pending" };
    let _ = writeln!(out, "{} {}", paint.header("Status:  "), paint.status(state));
    let _ = writeln!(
        out,
        "{} {}",
        paint.header("Database:"),
        paint.muted(&database.display().to_string())
    );
    let _ = writeln!(out, "{} {}", paint.header("Applied: "), report.migration_count);
    let _ = writeln!(
        out,
        "{} {}",
        paint.header("Latest:  "),
        report.last_migration.as_deref().unwrap_or("-")
    );

    if !report.pending.is_empty() {
        let _ = writeln!(out, "\n{}", paint.header(&format!("Pending ({}):", report.pending.len())));
        for name in &report.pending {
            if report.failed.contains(name) {
                let _ = writeln!(out, "  {name}  {}", paint.status("failed"));
            } else {
                let _ = writeln!(out, "  {name}");
            }
        }
    }
    if !report.unregistered.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            paint.header(&format!("Unregistered ({}):", report.unregistered.len()))
        );
        for name in &report.unregistered {
            let _ = writeln!(out, "  {}", paint.muted(name));
        }
    }
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
