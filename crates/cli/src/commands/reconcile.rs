// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel reconcile`: resync an id counter with its table.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use keel_core::SequenceState;
use keel_storage::SequenceReconciler;

use super::{with_store, Access, Context};
use crate::color::Paint;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct ReconcileArgs {
    /// Table whose ids the counter issues
    pub table: String,
    /// Counter name, e.g. tickets_id_seq
    pub counter: String,
    /// Primary key column
    #[arg(long, default_value = "id")]
    pub column: String,
}

pub fn handle(args: ReconcileArgs, ctx: &Context) -> Result<()> {
    let state = with_store(&ctx.config.database, Access::ReadWrite, |store| {
        Ok(SequenceReconciler::new(store).reconcile_column(
            &args.table,
            &args.column,
            &args.counter,
        )?)
    })?;

    match ctx.format {
        OutputFormat::Text => print!("{}", format_state(&state, &args.column, ctx.paint)),
        OutputFormat::Json => print_json(&state)?,
    }
    Ok(())
}

fn format_state(state: &SequenceState, column: &str, paint: Paint) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: next value {} -> {} (max {}.{column} is {})",
        state.counter,
        state.previous_next_value,
        state.next_counter_value,
        state.table,
        state.current_max_id
    );
    if state.was_behind() {
        let _ = writeln!(
            out,
            "{}",
            paint.warn("counter was behind its table; new rows could have collided")
        );
    }
    out
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
