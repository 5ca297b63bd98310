// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::IsTerminal;

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Secondary text such as timestamps and paths: darker grey
    pub const MUTED: u8 = 240;

    #[cfg(test)]
    pub const HEADER_START: &str = "\x1b[38;5;74m";
    #[cfg(test)]
    pub const MUTED_START: &str = "\x1b[38;5;240m";
    #[cfg(test)]
    pub const RESET: &str = "\x1b[0m";
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables, then `COLOR=1` forces, then TTY check.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    if crate::env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

/// Color decision captured once per command and handed to formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    colorize: bool,
}

impl Paint {
    pub fn detect() -> Self {
        Self {
            colorize: should_colorize(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { colorize: false }
    }

    #[cfg(test)]
    pub fn colored() -> Self {
        Self { colorize: true }
    }

    #[cfg(test)]
    pub fn enabled(self) -> bool {
        self.colorize
    }

    pub fn header(self, text: &str) -> String {
        self.when(text, apply_header)
    }

    pub fn muted(self, text: &str) -> String {
        self.when(text, apply_muted)
    }

    pub fn status(self, text: &str) -> String {
        self.when(text, apply_status)
    }

    /// Yellow (ANSI 33), for warnings.
    pub fn warn(self, text: &str) -> String {
        self.when(text, |t| format!("\x1b[33m{t}{RESET}"))
    }

    fn when(self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.colorize {
            style(text)
        } else {
            text.to_string()
        }
    }
}

pub(crate) fn apply_header(text: &str) -> String {
    format!("{}{}{}", fg256(codes::HEADER), text, RESET)
}

pub(crate) fn apply_muted(text: &str) -> String {
    format!("{}{}{}", fg256(codes::MUTED), text, RESET)
}

/// Colorize a migration or deploy status by its first word.
///
/// Green for settled states, yellow for work still to do, red for failures.
/// Unknown words are left uncolored.
pub(crate) fn apply_status(text: &str) -> String {
    let lower = text.trim_start().to_lowercase();
    let first_word = lower
        .split(|c: char| !c.is_alphabetic())
        .next()
        .unwrap_or("");
    let code = match first_word {
        "succeeded" | "ready" | "applied" | "created" => "\x1b[32m",
        "pending" | "skipped" | "unregistered" | "disabled" => "\x1b[33m",
        "failed" | "error" => "\x1b[31m",
        _ => return text.to_string(),
    };
    format!("{code}{text}{RESET}")
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
