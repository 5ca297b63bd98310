// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that carry a specific process exit code.

use std::fmt;

/// Deploy finished but verification still found pending migrations.
pub const EXIT_NOT_DEPLOYED: i32 = 2;

/// `status --check` found the store behind the registry.
pub const EXIT_NOT_READY: i32 = 3;

/// An error that exits the process with `code` instead of 1.
///
/// An empty message exits silently, for commands that already printed
/// their own explanation.
#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn silent(code: i32) -> Self {
        Self::new(code, "")
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}
