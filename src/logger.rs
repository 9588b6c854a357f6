//! Operator-facing message sink.
//!
//! The coordinator reports through the [`Logger`] capability so the terminal
//! rendering can be swapped for an in-memory recorder in tests.

use std::cell::RefCell;

use colored::Colorize;

pub trait Logger {
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
    fn success(&self, msg: &str);
}

/// Colored output: info and success on stdout, errors on stderr.
///
/// Quiet mode silences info and success, never errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalLogger {
    pub quiet: bool,
}

impl TerminalLogger {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Logger for TerminalLogger {
    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{} {}", "ℹ".blue(), msg);
        }
    }

    fn error(&self, msg: &str) {
        eprintln!("{} {}", "✗".red(), msg.red());
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{} {}", "✓".green(), msg);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
    Success,
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: RefCell<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.borrow().clone()
    }

    /// Messages logged at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: Level, msg: &str) {
        self.entries.borrow_mut().push((level, msg.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }

    fn success(&self, msg: &str) {
        self.push(Level::Success, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_logger_keeps_order_and_level() {
        let logger = RecordingLogger::new();
        logger.info("starting");
        logger.error("boom");
        logger.success("done");

        assert_eq!(
            logger.entries(),
            vec![
                (Level::Info, "starting".to_string()),
                (Level::Error, "boom".to_string()),
                (Level::Success, "done".to_string()),
            ]
        );
        assert_eq!(logger.messages(Level::Error), vec!["boom".to_string()]);
    }
}
