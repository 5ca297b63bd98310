// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use yare::parameterized;

#[test]
#[serial]
fn no_color_wins_over_force() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert!(!should_colorize());
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn color_forces_even_without_tty() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
    assert!(should_colorize());
    assert!(Paint::detect().enabled());
    std::env::remove_var("COLOR");
}

#[test]
fn colored_paint_wraps_text() {
    let paint = Paint::colored();
    assert_eq!(
        paint.header("Status"),
        format!("{}Status{}", codes::HEADER_START, codes::RESET)
    );
    assert_eq!(
        paint.muted("2026-01-15"),
        format!("{}2026-01-15{}", codes::MUTED_START, codes::RESET)
    );
    assert_eq!(paint.warn("careful"), format!("\x1b[33mcareful{}", codes::RESET));
}

#[test]
fn plain_paint_leaves_text_alone() {
    let paint = Paint::plain();
    assert_eq!(paint.header("Status"), "Status");
    assert_eq!(paint.muted("x"), "x");
    assert_eq!(paint.warn("careful"), "careful");
    assert_eq!(paint.status("failed"), "failed");
}

#[parameterized(
    succeeded = { "succeeded", "\x1b[32m" },
    ready = { "ready", "\x1b[32m" },
    created = { "created: keel.db", "\x1b[32m" },
    pending = { "pending", "\x1b[33m" },
    skipped = { "skipped", "\x1b[33m" },
    failed = { "failed", "\x1b[31m" },
    failed_with_reason = { "failed (disk full)", "\x1b[31m" },
)]
fn status_color_by_first_word(text: &str, code: &str) {
    assert_eq!(apply_status(text), format!("{code}{text}{}", codes::RESET));
}

#[test]
fn unknown_status_is_uncolored() {
    assert_eq!(apply_status("whatever"), "whatever");
}
