// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequence reconciliation specs

use crate::prelude::*;

#[test]
fn behind_counter_is_moved_past_the_table() {
    let project = Project::deployed();
    project.sql(
        "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 40) \
         INSERT INTO vendors (id, name) SELECT i, 'vendor ' || i FROM n;",
    );

    project
        .keel()
        .args(&["reconcile", "vendors", "vendors_id_seq"])
        .passes()
        .stdout_eq(
            "vendors_id_seq: next value 1 -> 41 (max vendors.id is 40)\n\
             counter was behind its table; new rows could have collided\n",
        );
}

#[test]
fn reconcile_is_idempotent() {
    let project = Project::deployed();
    project.sql("INSERT INTO clients (id, name) VALUES (7, 'Acme');");

    project.keel().args(&["reconcile", "clients", "clients_id_seq"]).passes();
    let state = project
        .keel()
        .args(&["reconcile", "clients", "clients_id_seq", "-o", "json"])
        .passes()
        .json();

    assert_eq!(state["current_max_id"], 7);
    assert_eq!(state["previous_next_value"], 8);
    assert_eq!(state["next_counter_value"], 8);
}

#[test]
fn empty_table_resets_counter_to_one() {
    let project = Project::deployed();
    project.sql("UPDATE id_sequences SET next_value = 500 WHERE name = 'users_id_seq';");

    project
        .keel()
        .args(&["reconcile", "users", "users_id_seq"])
        .passes()
        .stdout_eq("users_id_seq: next value 500 -> 1 (max users.id is 0)\n");
}
