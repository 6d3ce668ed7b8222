//! Run state and the reducer that drives it
//!
//! One run owns exactly one `RunState`; the fetch loop is its only writer and
//! every change goes through `RunState::apply`.

use crate::sweep::errors::ErrorLog;
use serde::Serialize;
use std::fmt;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created, no page requested yet
    Idle,

    /// Pages are being requested
    Running,

    /// Every planned page resolved (successfully or not)
    Completed,

    /// Stopped before the last page
    Stopped,
}

impl Phase {
    /// Returns true if the run can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened to a run
#[derive(Debug, Clone)]
pub enum RunEvent<T> {
    Started,
    PageSucceeded { page: u32, items: Vec<T> },
    PageFailed { page: u32, message: String },
    Stopped,
}

/// Accumulated state of one run
#[derive(Debug, Clone)]
pub struct RunState<T> {
    phase: Phase,
    current_page: u32,
    total_pages: u32,
    items: Vec<T>,
    errors: ErrorLog,
}

impl<T> RunState<T> {
    pub fn new(total_pages: u32) -> Self {
        Self {
            phase: Phase::Idle,
            current_page: 0,
            total_pages,
            items: Vec::new(),
            errors: ErrorLog::new(),
        }
    }

    /// Applies one event and returns the next state
    ///
    /// Page events are accepted only while running and only for the page
    /// after `current_page`; anything else leaves the state unchanged.
    pub fn apply(mut self, event: RunEvent<T>) -> Self {
        match event {
            RunEvent::Started => {
                if self.phase == Phase::Idle {
                    self.phase = if self.total_pages == 0 {
                        Phase::Completed
                    } else {
                        Phase::Running
                    };
                }
            }
            RunEvent::PageSucceeded { page, items } => {
                if self.accepts_page(page) {
                    self.items.extend(items);
                    self.advance(page);
                }
            }
            RunEvent::PageFailed { page, message } => {
                if self.accepts_page(page) {
                    self.errors.record(page, message);
                    self.advance(page);
                }
            }
            RunEvent::Stopped => {
                if self.phase == Phase::Running {
                    self.phase = Phase::Stopped;
                }
            }
        }
        self
    }

    fn accepts_page(&self, page: u32) -> bool {
        self.phase == Phase::Running && page == self.current_page + 1
    }

    fn advance(&mut self, page: u32) {
        self.current_page = page;
        if self.current_page >= self.total_pages {
            self.phase = Phase::Completed;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Number of pages resolved so far
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// `current_page / total_pages * 100`
    pub fn percent(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        f64::from(self.current_page) / f64::from(self.total_pages) * 100.0
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn progress(&self) -> Progress {
        Progress {
            phase: self.phase,
            current_page: self.current_page,
            total_pages: self.total_pages,
            percent: self.percent(),
            item_count: self.items.len(),
            error_count: self.errors.len(),
        }
    }
}

/// Snapshot of a run for observers (progress bars, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub phase: Phase,
    pub current_page: u32,
    pub total_pages: u32,
    pub percent: f64,
    pub item_count: usize,
    pub error_count: usize,
}

impl Default for Progress {
    fn default() -> Self {
        RunState::<()>::new(0).progress()
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {}/{} ({:.0}%), {} records, {} errors",
            self.current_page, self.total_pages, self.percent, self.item_count, self.error_count
        )
    }
}
