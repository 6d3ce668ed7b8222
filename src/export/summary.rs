//! Summary of one finished run

use crate::sweep::{Phase, RunState};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Statistics and outcome of one run, used for the report and CLI output
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// What was run, e.g. `search "fone bluetooth" (BR)`
    pub title: String,

    pub phase: Phase,
    pub total_pages: u32,
    pub pages_completed: u32,
    pub percent: f64,
    pub record_count: usize,

    /// Page errors as display strings, in occurrence order
    pub errors: Vec<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Hash of the configuration file the run used
    pub config_hash: Option<String>,

    /// Where the export was written (None for an empty run)
    pub export_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn from_state<T>(
        title: impl Into<String>,
        state: &RunState<T>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            phase: state.phase(),
            total_pages: state.total_pages(),
            pages_completed: state.current_page(),
            percent: state.percent(),
            record_count: state.item_count(),
            errors: state.errors().messages(),
            started_at,
            finished_at,
            config_hash: None,
            export_path: None,
        }
    }

    /// Pages that resolved successfully
    pub fn pages_succeeded(&self) -> u32 {
        self.pages_completed
            .saturating_sub(u32::try_from(self.errors.len()).unwrap_or(u32::MAX))
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// True when the run produced no records
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::RunEvent;

    #[test]
    fn test_from_state() {
        let state = RunState::new(3)
            .apply(RunEvent::Started)
            .apply(RunEvent::PageSucceeded { page: 1, items: vec!['a', 'b'] })
            .apply(RunEvent::PageFailed { page: 2, message: "HTTP 502".to_string() })
            .apply(RunEvent::PageSucceeded { page: 3, items: vec!['c'] });

        let now = Utc::now();
        let summary = RunSummary::from_state("search \"x\" (BR)", &state, now, now);

        assert_eq!(summary.phase, Phase::Completed);
        assert_eq!(summary.pages_completed, 3);
        assert_eq!(summary.pages_succeeded(), 2);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.errors, vec!["Page 2: HTTP 502".to_string()]);
        assert_eq!(summary.percent, 100.0);
        assert!(!summary.is_empty());
        assert_eq!(summary.duration_seconds(), 0);
    }
}
