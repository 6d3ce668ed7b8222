//! Sequential page runner - the main aggregation loop
//!
//! This module walks a `PageSource` one page at a time:
//! - Requests pages strictly in order, never in parallel
//! - Folds each page outcome into the run state
//! - Keeps going when a page fails
//! - Waits a fixed delay between pages
//! - Honours the stop signal between pages and while a request is in flight

use crate::config::RunConfig;
use crate::sweep::source::PageSource;
use crate::sweep::state::{Progress, RunEvent, RunState};
use crate::sweep::stop::StopSignal;
use crate::SweepError;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Pacing of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Number of pages to request
    pub total_pages: u32,

    /// Delay between consecutive requests (not applied after the last page)
    pub delay: Duration,
}

impl RunSettings {
    pub fn new(total_pages: u32, delay: Duration) -> Self {
        Self { total_pages, delay }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from(&RunConfig::default())
    }
}

impl From<&RunConfig> for RunSettings {
    fn from(config: &RunConfig) -> Self {
        Self::new(config.pages, Duration::from_millis(config.delay_ms))
    }
}

/// Drives runs and publishes their progress
pub struct SweepRunner {
    settings: RunSettings,
    stop: StopSignal,
    progress: watch::Sender<Progress>,
}

impl SweepRunner {
    pub fn new(settings: RunSettings) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            settings,
            stop: StopSignal::new(),
            progress,
        }
    }

    pub fn settings(&self) -> RunSettings {
        self.settings
    }

    /// Handle that stops the current run
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Receiver that sees a fresh `Progress` after every page
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Runs one aggregation over `source`
    ///
    /// # Run Flow
    ///
    /// 1. Validate the source parameters; on failure return before any request
    /// 2. For page = 1..=N in order:
    ///    a. stop requested → `Stopped`, leave the loop
    ///    b. fetch the page, racing the stop signal
    ///    c. success → `PageSucceeded`, failure → `PageFailed`
    ///    d. sleep the delay unless this was the last page
    ///
    /// # Returns
    ///
    /// * `Ok(RunState)` - Final state; page failures are in `errors()`
    /// * `Err(SweepError::Validation)` - Parameters rejected, nothing requested
    pub async fn run<S: PageSource>(&self, source: &S) -> Result<RunState<S::Item>, SweepError> {
        source.validate()?;
        self.stop.reset();

        let total = self.settings.total_pages;
        let description = source.describe();
        let start_time = Instant::now();

        let mut state = RunState::new(total).apply(RunEvent::Started);
        self.publish(&state);
        tracing::info!("Starting {} over {} pages", description, total);

        for page in 1..=total {
            if self.stop.is_stopped() {
                tracing::info!("Stop requested before page {}", page);
                state = state.apply(RunEvent::Stopped);
                break;
            }

            tracing::debug!("Requesting page {}/{} for {}", page, total, description);

            let outcome = tokio::select! {
                biased;
                _ = self.stop.stopped() => None,
                result = source.fetch_page(page) => Some(result),
            };

            let Some(result) = outcome else {
                tracing::info!("Stop requested while page {} was in flight", page);
                state = state.apply(RunEvent::Stopped);
                break;
            };

            state = match result {
                Ok(items) => {
                    tracing::debug!("Page {} returned {} records", page, items.len());
                    state.apply(RunEvent::PageSucceeded { page, items })
                }
                Err(e) => {
                    tracing::warn!("Page {} failed for {}: {}", page, description, e);
                    state.apply(RunEvent::PageFailed {
                        page,
                        message: e.to_string(),
                    })
                }
            };

            self.publish(&state);
            tracing::debug!("Progress: {}", state.progress());

            if page < total && !self.settings.delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.stop.stopped() => {}
                    _ = tokio::time::sleep(self.settings.delay) => {}
                }
            }
        }

        self.publish(&state);
        tracing::info!(
            "Run {} for {}: {} records, {} page errors in {:?}",
            state.phase(),
            description,
            state.item_count(),
            state.errors().len(),
            start_time.elapsed()
        );

        Ok(state)
    }

    fn publish<T>(&self, state: &RunState<T>) {
        self.progress.send_replace(state.progress());
    }
}
