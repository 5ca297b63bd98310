// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file and environment override specs

use crate::prelude::*;

#[test]
fn config_file_relocates_the_database() {
    let project = Project::empty();
    project.file("keel.toml", "database = \"data/app.db\"\n");

    project.keel().args(&["migrate"]).passes();

    assert!(project.path().join("data/app.db").exists());
    assert!(!project.db_path().exists());
}

#[test]
fn environment_database_beats_config_file() {
    let project = Project::empty();
    project.file("keel.toml", "database = \"from-file.db\"\n");

    project
        .keel()
        .env("KEEL_DATABASE", project.path().join("from-env.db"))
        .args(&["migrate"])
        .passes();

    assert!(project.path().join("from-env.db").exists());
    assert!(!project.path().join("from-file.db").exists());
}

#[test]
fn db_flag_beats_environment() {
    let project = Project::empty();

    project
        .keel()
        .env("KEEL_DATABASE", project.path().join("from-env.db"))
        .args(&["migrate", "--db", "from-flag.db"])
        .passes();

    assert!(project.path().join("from-flag.db").exists());
    assert!(!project.path().join("from-env.db").exists());
}

#[test]
fn keel_config_env_selects_the_file() {
    let project = Project::empty();
    project.file("ops/prod.toml", "database = \"prod.db\"\n");

    project
        .keel()
        .env("KEEL_CONFIG", project.path().join("ops/prod.toml"))
        .args(&["migrate"])
        .passes();

    assert!(project.path().join("ops/prod.db").exists());
}

#[test]
fn log_file_receives_tracing_output() {
    let project = Project::empty();
    project.file(
        "keel.toml",
        "[log]\nfilter = \"info\"\nfile = \"logs/keel.log\"\n",
    );

    project.keel().args(&["migrate"]).passes();

    let log = std::fs::read_to_string(project.path().join("logs/keel.log")).unwrap();
    assert!(log.contains("001_baseline_schema"));
}
