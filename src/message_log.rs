//! Sinks for received-message log lines.
//!
//! Every data frame a client sends becomes exactly one line of the form
//! `received: <payload>`. [`StdoutLog`] is what the binary uses;
//! [`MemoryLog`] keeps lines in memory for tests and embedders.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Prefix of every message log line.
pub const LINE_PREFIX: &str = "received: ";

/// Formats a payload as a message log line, without trailing newline.
#[must_use]
pub fn format_line(payload: &str) -> String {
    format!("{LINE_PREFIX}{payload}")
}

/// Destination for message log lines.
///
/// Implementations must write each line atomically with respect to other
/// callers so that lines from concurrent connections never interleave.
pub trait MessageLog: Send + Sync + Debug {
    /// Records one received payload.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the line could not be written.
    fn record(&self, payload: &str) -> io::Result<()>;
}

/// Writes message lines to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLog;

impl MessageLog for StdoutLog {
    fn record(&self, payload: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", format_line(payload))?;
        out.flush()
    }
}

/// In-memory message log.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line recorded so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of recorded lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageLog for MemoryLog {
    fn record(&self, payload: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format_line(payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_prefixes_payload() {
        assert_eq!(format_line("hello"), "received: hello");
        assert_eq!(format_line(""), "received: ");
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryLog::new();
        assert!(log.is_empty());
        for payload in ["one", "two", "three"] {
            assert!(log.record(payload).is_ok());
        }
        assert_eq!(
            log.lines(),
            vec!["received: one", "received: two", "received: three"]
        );
        assert_eq!(log.len(), 3);
    }
}
