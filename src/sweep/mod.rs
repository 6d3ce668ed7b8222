//! Sweep module - sequential paginated aggregation
//!
//! This module contains the core run logic, including:
//! - Page sources for the search and review endpoints
//! - The sequential page runner with inter-page delay
//! - The run state reducer and progress snapshots
//! - The per-page error log
//! - The stop signal used to cancel a run

mod errors;
mod runner;
mod source;
mod state;
mod stop;

pub use errors::{ErrorLog, PageError};
pub use runner::{RunSettings, SweepRunner};
pub use source::{PageSource, ReviewPageSource, SearchPageSource};
pub use state::{Phase, Progress, RunEvent, RunState};
pub use stop::StopSignal;
