// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! keel-core: Shared types for the Keel schema migration engine

pub mod clock;
pub mod code;
pub mod migration;
pub mod readiness;
pub mod sequence;
pub mod time_fmt;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use code::{CodeFormatError, DateKey, UniqueCode, SUFFIX_WIDTH};
pub use migration::{MigrationRecord, MigrationStatus};
pub use readiness::ReadinessReport;
pub use sequence::SequenceState;
pub use time_fmt::{format_age, format_duration_ms};
