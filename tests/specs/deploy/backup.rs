// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-deploy and on-demand backup specs

use crate::prelude::*;

/// Deployed project with one migration made pending again.
fn project_with_pending_migration() -> Project {
    let project = Project::deployed();
    project.sql("DELETE FROM schema_migrations WHERE name = '005_reconcile_id_sequences';");
    project
}

#[test]
fn pending_migration_on_existing_database_is_backed_up() {
    let project = project_with_pending_migration();

    project
        .keel()
        .args(&["deploy"])
        .passes()
        .stdout_has("Backup: created keel-")
        .stdout_has("Applied: 1 migration(s)\n  005_reconcile_id_sequences\n");

    let backups = project.backups();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("keel-"));
    assert!(backups[0].ends_with("-pre-deploy.db"));
}

#[test]
fn backup_holds_the_pre_deploy_state() {
    let project = project_with_pending_migration();
    project.keel().args(&["deploy"]).passes();

    let backup = project.backup_dir().join(&project.backups()[0]);
    let conn = rusqlite::Connection::open(backup).unwrap();
    let recorded: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE name = '005_reconcile_id_sequences'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(recorded, 0);
}

#[test]
fn no_backup_flag_skips_the_snapshot() {
    let project = project_with_pending_migration();

    project
        .keel()
        .args(&["deploy", "--no-backup"])
        .passes()
        .stdout_has("Backup: disabled\n");

    assert!(project.backups().is_empty());
}

#[test]
fn disabled_in_config_skips_the_snapshot() {
    let project = project_with_pending_migration();
    project.file("keel.toml", "[backup]\nenabled = false\n");

    project
        .keel()
        .args(&["deploy"])
        .passes()
        .stdout_has("Backup: disabled\n");
}

#[test]
fn backup_command_forces_a_snapshot() {
    let project = Project::deployed();

    project
        .keel()
        .args(&["backup"])
        .passes()
        .stdout_has("created keel-");

    assert_eq!(project.backups().len(), 1);
}

#[test]
fn compressed_backups_use_zst_extension() {
    let project = Project::deployed();
    project.file("keel.toml", "[backup]\ncompress = true\ndir = \"snapshots\"\n");

    let backup = project.keel().args(&["backup", "-o", "json"]).passes().json();

    assert_eq!(backup["compressed"], true);
    let id = backup["id"].as_str().unwrap();
    assert!(id.ends_with("-pre-deploy.db.zst"));
    assert!(project.path().join("snapshots").join(id).exists());
}

#[test]
fn retention_keeps_the_newest_backups() {
    let project = Project::deployed();
    project.file("keel.toml", "[backup]\nkeep = 2\n");

    for _ in 0..3 {
        project.keel().args(&["backup"]).passes();
    }

    assert_eq!(project.backups().len(), 2);
}
