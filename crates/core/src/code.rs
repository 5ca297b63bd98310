// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Date-scoped business codes such as ticket numbers.
//!
//! A code reads `PREFIX-YYYYMMDD-NNN`. The date key scopes the numeric
//! series to one UTC day, so codes from different days never collide even
//! when they share a prefix.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum width of the numeric suffix; longer suffixes are kept as-is.
pub const SUFFIX_WIDTH: usize = 3;

/// Maximum prefix length.
pub const MAX_PREFIX_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeFormatError {
    #[error("code prefix must be 1-{MAX_PREFIX_LEN} ASCII letters or digits, got '{0}'")]
    InvalidPrefix(String),
    #[error("malformed code '{0}': expected PREFIX-YYYYMMDD-NNN")]
    Malformed(String),
}

/// Calendar day a code series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The UTC calendar day of `at`.
    pub fn of(at: DateTime<Utc>) -> Self {
        Self(at.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    fn parse(s: &str) -> Option<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y%m%d").ok().map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// Validate a code prefix.
///
/// Restricting prefixes to ASCII alphanumerics keeps them free of the `-`
/// separator and of SQL pattern metacharacters.
pub fn validate_prefix(prefix: &str) -> Result<(), CodeFormatError> {
    let ok = !prefix.is_empty()
        && prefix.len() <= MAX_PREFIX_LEN
        && prefix.bytes().all(|b| b.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(CodeFormatError::InvalidPrefix(prefix.to_string()))
    }
}

/// A generated `PREFIX-YYYYMMDD-NNN` code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueCode {
    prefix: String,
    date: DateKey,
    sequence: u64,
}

impl UniqueCode {
    pub fn new(prefix: &str, date: DateKey, sequence: u64) -> Result<Self, CodeFormatError> {
        validate_prefix(prefix)?;
        Ok(Self {
            prefix: prefix.to_string(),
            date,
            sequence,
        })
    }

    /// Parse a rendered code back into its parts.
    pub fn parse(code: &str) -> Result<Self, CodeFormatError> {
        let malformed = || CodeFormatError::Malformed(code.to_string());

        let mut parts = code.splitn(3, '-');
        let (Some(prefix), Some(date), Some(suffix)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        validate_prefix(prefix).map_err(|_| malformed())?;
        let date = DateKey::parse(date).ok_or_else(malformed)?;
        if suffix.len() < SUFFIX_WIDTH || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let sequence = suffix.parse().map_err(|_| malformed())?;

        Ok(Self {
            prefix: prefix.to_string(),
            date,
            sequence,
        })
    }

    /// The shared `PREFIX-YYYYMMDD-` head of every code in one daily series.
    pub fn series_head(prefix: &str, date: DateKey) -> String {
        format!("{prefix}-{date}-")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The next code in the same daily series.
    pub fn successor(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            date: self.date,
            sequence: self.sequence + 1,
        }
    }
}

impl fmt::Display for UniqueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            Self::series_head(&self.prefix, self.date),
            self.sequence,
            width = SUFFIX_WIDTH
        )
    }
}

impl Serialize for UniqueCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UniqueCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "code_tests.rs"]
mod tests;
