//! Non-fatal per-page failures collected during a run

use std::fmt;

/// A failure of one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    /// Page number the failure belongs to (1-based)
    pub page: u32,

    /// Human-readable message
    pub message: String,
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}: {}", self.page, self.message)
    }
}

/// Ordered list of page failures
///
/// Failures are never classified or retried; each one is kept as a display
/// string tagged with its page and surfaced when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    entries: Vec<PageError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, page: u32, message: impl Into<String>) {
        self.entries.push(PageError {
            page,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[PageError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pages that failed, in occurrence order
    pub fn failed_pages(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.page).collect()
    }

    /// Display strings (`Page <k>: <message>`)
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
