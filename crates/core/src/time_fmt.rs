// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations for migration timings and ledger ages.

/// Format a migration's wall-clock time: `"850ms"`, `"1.2s"`, `"2m5s"`.
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{}.{}s", ms / 1000, (ms % 1000) / 100)
    } else {
        let secs = ms / 1000;
        let m = secs / 60;
        let s = secs % 60;
        if s > 0 {
            format!("{}m{}s", m, s)
        } else {
            format!("{}m", m)
        }
    }
}

/// Format how long ago something happened: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
pub fn format_age(secs: u64) -> String {
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86399 => match (secs % 3600) / 60 {
            0 => format!("{}h", secs / 3600),
            m => format!("{}h{}m", secs / 3600, m),
        },
        _ => format!("{}d", secs / 86400),
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
