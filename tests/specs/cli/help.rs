// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn help_lists_every_command() {
    let run = cli().args(&["--help"]).passes();
    for command in ["deploy", "migrate", "status", "history", "reconcile", "backup"] {
        assert!(run.stdout().contains(command), "help lacks {command}");
    }
}

#[test]
fn deploy_help_shows_no_backup_flag() {
    cli()
        .args(&["deploy", "--help"])
        .passes()
        .stdout_has("--no-backup")
        .stdout_has("--db");
}

#[test]
fn status_help_shows_check_flag() {
    cli().args(&["status", "--help"]).passes().stdout_has("--check");
}
