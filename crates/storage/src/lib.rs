// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for Keel: the SQLite store handle and the components that
//! read and write it directly.

mod backup;
mod codegen;
mod counter;
mod error;
mod ident;
mod ledger;
mod reconcile;
mod store;

pub use backup::{
    backup_stem, Backup, BackupCoordinator, BackupError, BackupOutcome, BackupWriter, FsBackupWriter,
    DEFAULT_KEEP,
};
pub use codegen::{CodeColumn, CodeError, CodeGenerator, DEFAULT_MAX_ATTEMPTS};
pub use counter::{Counters, COUNTER_TABLE, COUNTER_TABLE_DDL};
pub use error::StoreError;
pub use ident::quote_ident;
pub use ledger::{Ledger, LedgerState, LEDGER_TABLE};
pub use reconcile::SequenceReconciler;
pub use store::{Executor, SchemaObject, Store};
