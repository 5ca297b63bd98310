// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel deploy`: check, back up, migrate, verify.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use keel_core::SystemClock;
use keel_engine::{builtin_registry, DeployError, DeployReport, Deployment};
use keel_storage::{BackupCoordinator, BackupOutcome};

use super::{with_store, Access, Context};
use crate::color::Paint;
use crate::exit_error::{ExitError, EXIT_NOT_DEPLOYED};
use crate::output::{format_bytes, print_json, OutputFormat};

#[derive(Args)]
pub struct DeployArgs {
    /// Skip the pre-deploy backup
    #[arg(long)]
    pub no_backup: bool,
}

pub fn handle(args: DeployArgs, ctx: &Context) -> Result<()> {
    let registry = builtin_registry()?;
    let backup = &ctx.config.backup;
    let coordinator = BackupCoordinator::new(&backup.dir, SystemClock)
        .keep(backup.keep)
        .compress(backup.compress);
    let use_backups = backup.enabled && !args.no_backup;

    let result = with_store(&ctx.config.database, Access::ReadWrite, |store| {
        let mut deployment = Deployment::new(store, &registry, SystemClock);
        if use_backups {
            deployment = deployment.with_backups(&coordinator);
        }
        Ok(deployment.deploy())
    })?;

    let report = match result {
        Ok(report) => report,
        Err(e @ DeployError::NotReady { .. }) => {
            return Err(ExitError::new(EXIT_NOT_DEPLOYED, e.to_string()).into())
        }
        Err(e) => return Err(e.into()),
    };

    match ctx.format {
        OutputFormat::Text => print!("{}", format_report(&report, ctx.paint)),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

fn format_report(report: &DeployReport, paint: Paint) -> String {
    let mut out = String::new();
    if report.before.is_ready {
        let _ = writeln!(
            out,
            "Already up to date ({} migration(s) applied)",
            report.after.migration_count
        );
        return out;
    }

    let backup = match &report.backup {
        None => paint.status("disabled"),
        Some(BackupOutcome::Skipped) => paint.status("skipped (no migration history)"),
        Some(BackupOutcome::Created(b)) => format!(
            "{} {} ({})",
            paint.status("created"),
            b.id,
            format_bytes(b.size_bytes)
        ),
        Some(BackupOutcome::Failed { reason }) => {
            format!("{} {}", paint.status("failed:"), paint.warn(reason))
        }
    };
    let _ = writeln!(out, "{} {backup}", paint.header("Backup:"));

    let _ = writeln!(
        out,
        "{} {} migration(s)",
        paint.header("Applied:"),
        report.run.applied_count()
    );
    for name in &report.run.applied {
        let _ = writeln!(out, "  {name}");
    }

    let latest = report.after.last_migration.as_deref().unwrap_or("-");
    let _ = writeln!(
        out,
        "{} {} migration(s) applied, latest {latest}",
        paint.status("ready:"),
        report.after.migration_count
    );
    out
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
