// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod backup;
pub mod deploy;
pub mod history;
pub mod migrate;
pub mod reconcile;
pub mod status;

use std::path::Path;

use anyhow::{Context as _, Result};
use keel_storage::Store;

use crate::color::Paint;
use crate::config::Config;
use crate::output::OutputFormat;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub paint: Paint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Never creates or modifies the database. An absent file reads as an
    /// empty store.
    ReadOnly,
}

/// Open the store, run `f`, and close the store on every path.
///
/// An error from `f` wins over a close error.
pub fn with_store<T>(path: &Path, access: Access, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
    let store = match access {
        Access::ReadWrite => Store::open(path),
        Access::ReadOnly if !path.exists() => {
            tracing::debug!(path = %path.display(), "database absent, reading as empty");
            Store::open_in_memory()
        }
        Access::ReadOnly => Store::open_read_only(path),
    }
    .with_context(|| format!("failed to open database {}", path.display()))?;

    let result = f(&store);
    let closed = store.close();
    let value = result?;
    closed.with_context(|| format!("failed to close database {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
#[path = "../commands_tests.rs"]
mod tests;
