// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Keel migration engine

mod deploy;
mod migration;
mod readiness;
mod registry;
mod runner;
pub mod schema;

pub use deploy::{DeployError, DeployReport, Deployment};
pub use migration::{FnMigration, Migration, MigrationError, SqlMigration};
pub use readiness::ReadinessChecker;
pub use registry::{MigrationRegistry, RegistryError};
pub use runner::{MigrationRunner, RunError, RunSummary};
pub use schema::{builtin_registry, BUILTIN_COUNTERS};
