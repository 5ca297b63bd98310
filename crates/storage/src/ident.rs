// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQL identifier validation.

use crate::StoreError;

/// Validate `name` as a plain identifier and return it double-quoted.
///
/// Only `[A-Za-z_][A-Za-z0-9_]*` is accepted. Table and column names that
/// reach SQL text through operator input go through here first.
pub fn quote_ident(name: &str) -> Result<String, StoreError> {
    let mut bytes = name.bytes();
    let valid = match bytes.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == b'_')
                && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        None => false,
    };
    if valid {
        Ok(format!("\"{name}\""))
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}
