// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in migrations for the compliance store.

mod baseline;
mod upgrades;

use crate::{MigrationRegistry, RegistryError};

pub use baseline::{baseline, baseline_sql, BASELINE};
pub use upgrades::{
    compliance_status, reconcile_sequences, status_history, ticket_number_index,
    COMPLIANCE_STATUS, RECONCILE_SEQUENCES, STATUS_HISTORY, TICKET_NUMBER_INDEX,
};

/// Business tables and the counters that issue their ids.
pub const BUILTIN_COUNTERS: &[(&str, &str)] = &[
    ("vendors", "vendors_id_seq"),
    ("clients", "clients_id_seq"),
    ("users", "users_id_seq"),
    ("equipment", "equipment_id_seq"),
    ("inspections", "inspections_id_seq"),
    ("tickets", "tickets_id_seq"),
];

/// Every migration the product ships, in execution order.
pub fn builtin_registry() -> Result<MigrationRegistry, RegistryError> {
    MigrationRegistry::new()
        .with(baseline())?
        .with(ticket_number_index())?
        .with(compliance_status())?
        .with(status_history())?
        .with(reconcile_sequences())
}

#[cfg(test)]
#[path = "../schema_tests.rs"]
mod tests;
