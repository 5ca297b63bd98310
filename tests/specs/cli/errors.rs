// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI error handling specs

use crate::prelude::*;

#[test]
fn unknown_subcommand_is_a_usage_error() {
    cli().args(&["rollback"]).exits(2).stderr_has("unrecognized subcommand");
}

#[test]
fn explicit_config_must_exist() {
    let project = Project::empty();
    project
        .keel()
        .args(&["--config", "missing.toml", "status"])
        .exits(1)
        .stderr_has("config file not found: missing.toml");
}

#[test]
fn invalid_config_names_the_file() {
    let project = Project::empty();
    project.file("keel.toml", "[backup]\nretain = 3\n");
    project
        .keel()
        .args(&["status"])
        .exits(1)
        .stderr_has("invalid config");
}

#[test]
fn backup_without_database_fails() {
    let project = Project::empty();
    project
        .keel()
        .args(&["backup"])
        .exits(1)
        .stderr_has("database not found");
    assert!(!project.db_path().exists());
}

#[test]
fn unknown_counter_is_reported() {
    let project = Project::deployed();
    project
        .keel()
        .args(&["reconcile", "vendors", "nope_seq"])
        .exits(1)
        .stderr_has("unknown counter 'nope_seq'");
}

#[test]
fn unsafe_identifier_is_rejected_before_any_sql() {
    let project = Project::deployed();
    project
        .keel()
        .args(&["reconcile", "vendors; DROP TABLE users", "vendors_id_seq"])
        .exits(1)
        .stderr_has("invalid SQL identifier");
}

#[test]
fn errors_are_prefixed_and_not_repeated() {
    let project = Project::empty();
    let run = project
        .keel()
        .args(&["--config", "missing.toml", "status"])
        .fails();
    let stderr = run.stderr();
    assert!(stderr.starts_with("Error: "));
    assert_eq!(stderr.matches("missing.toml").count(), 1);
}
