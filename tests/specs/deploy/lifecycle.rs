// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deploy and migrate specs against a real database file

use crate::prelude::*;

#[test]
fn fresh_deploy_applies_everything_without_backup() {
    let project = Project::empty();

    project.keel().args(&["deploy"]).passes().stdout_eq(
        "Backup: skipped (no migration history)\n\
         Applied: 5 migration(s)\n  \
         001_baseline_schema\n  \
         002_ticket_number_unique_index\n  \
         003_equipment_compliance_status\n  \
         004_ticket_status_history\n  \
         005_reconcile_id_sequences\n\
         ready: 5 migration(s) applied, latest 005_reconcile_id_sequences\n",
    );

    assert!(project.backups().is_empty());
}

#[test]
fn second_deploy_is_a_no_op() {
    let project = Project::deployed();

    project
        .keel()
        .args(&["deploy"])
        .passes()
        .stdout_eq("Already up to date (5 migration(s) applied)\n");
}

#[test]
fn migrate_reports_up_to_date_on_rerun() {
    let project = Project::empty();
    project
        .keel()
        .args(&["migrate"])
        .passes()
        .stdout_has("applied 5 migration(s)");

    project
        .keel()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Already up to date (5 migration(s) applied)\n");
}

#[test]
fn deploy_json_report() {
    let project = Project::empty();
    let report = project.keel().args(&["deploy", "-o", "json"]).passes().json();

    assert_eq!(report["before"]["is_ready"], false);
    assert_eq!(report["backup"]["status"], "skipped");
    assert_eq!(report["run"]["applied"].as_array().unwrap().len(), 5);
    assert_eq!(report["after"]["is_ready"], true);
    assert_eq!(report["after"]["migration_count"], 5);
}

#[test]
fn history_lists_every_builtin() {
    let project = Project::deployed();
    let run = project.keel().args(&["history"]).passes();
    let stdout = run.stdout();

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), BUILTIN_MIGRATIONS.len() + 1);
    assert!(lines[0].starts_with("NAME"));
    for name in BUILTIN_MIGRATIONS {
        assert!(stdout.contains(name), "history lacks {name}");
    }
    assert_eq!(stdout.matches("succeeded").count(), BUILTIN_MIGRATIONS.len());
}

#[test]
fn history_of_missing_database_is_empty() {
    let project = Project::empty();
    project
        .keel()
        .args(&["history"])
        .passes()
        .stdout_eq("No migrations recorded\n");
    assert!(!project.db_path().exists());
}

#[test]
fn history_json_has_records() {
    let project = Project::deployed();
    let records = project.keel().args(&["history", "-o", "json"]).passes().json();
    let records = records.as_array().unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["succeeded"], true);
    assert!(records[0]["duration_ms"].is_u64());
}
