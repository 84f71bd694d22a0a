//! Progress reporting collaborator.
//!
//! Components depend on the [`Reporter`] capability instead of writing to
//! the terminal directly, so orchestration stays testable and presentation
//! concerns (colors, message templates) live in one place.

/// Capability interface for human-readable progress output.
///
/// Console output is observable but not part of any functional contract.
pub trait Reporter: Sync {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

const RESET: &str = "\u{1b}[0;0m";
const GREEN: &str = "\u{1b}[0;32m";
const YELLOW: &str = "\u{1b}[0;33m";
const RED: &str = "\u{1b}[0;31m";

/// Reporter that writes ANSI-colored lines to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn emit(&self, color: &str, msg: &str) {
        if self.color {
            eprintln!("{}{}{}", color, msg, RESET);
        } else {
            eprintln!("{}", msg);
        }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, msg: &str) {
        self.emit(GREEN, msg);
    }

    fn warn(&self, msg: &str) {
        self.emit(YELLOW, msg);
    }

    fn error(&self, msg: &str) {
        self.emit(RED, msg);
    }
}
