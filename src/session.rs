//! Session - one configured backend plus the runner that walks it
//!
//! A session wires the pieces together for the CLI (and for embedding):
//! build the authenticated client, run a sweep, export the records and
//! optionally write the run report.

use crate::client::ApiClient;
use crate::config::Config;
use crate::export::{
    export_file_name, write_export, write_run_report, ExportFormat, RunSummary, Table, Tabular,
};
use crate::model::{Product, Review, ReviewRequest, SearchRequest};
use crate::sweep::{
    PageSource, Progress, ReviewPageSource, RunSettings, SearchPageSource, StopSignal, SweepRunner,
};
use crate::SweepError;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Result of one session run
#[derive(Debug, Clone)]
pub struct SessionOutcome<T> {
    pub summary: RunSummary,

    /// Accumulated records, page order then within-page order
    pub items: Vec<T>,

    /// Export file (None when the run produced no records)
    pub export_path: Option<PathBuf>,

    /// Markdown run report, when enabled in the output config
    pub report_path: Option<PathBuf>,
}

impl<T> SessionOutcome<T> {
    /// True when no records were found; not an error
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.summary.errors
    }
}

/// A configured backend ready to run searches
pub struct Session {
    config: Config,
    config_hash: Option<String>,
    client: ApiClient,
    runner: SweepRunner,
}

impl Session {
    /// Creates a session
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `token` - Bearer token for the backend, if any
    pub fn new(config: Config, token: Option<String>) -> Result<Self, SweepError> {
        let client = ApiClient::new(&config.api, &config.user_agent, token.as_deref())?;
        let runner = SweepRunner::new(RunSettings::from(&config.run));

        Ok(Self {
            config,
            config_hash: None,
            client,
            runner,
        })
    }

    /// Records the configuration hash in run reports
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle that stops the run in progress
    pub fn stop_signal(&self) -> StopSignal {
        self.runner.stop_signal()
    }

    /// Progress updates, one per page
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.runner.subscribe()
    }

    /// Runs a keyword search and exports the products
    ///
    /// # Returns
    ///
    /// * `Ok(SessionOutcome)` - The run finished (possibly with page errors,
    ///   possibly empty, possibly stopped early)
    /// * `Err(SweepError)` - The request was invalid or the export failed
    pub async fn search(
        &self,
        request: SearchRequest,
        date: NaiveDate,
    ) -> Result<SessionOutcome<Product>, SweepError> {
        let subject = request.query.clone();
        let source = SearchPageSource::new(self.client.clone(), request);
        self.execute(&source, "search", &subject, date).await
    }

    /// Extracts reviews for one product and exports them
    pub async fn reviews(
        &self,
        request: ReviewRequest,
        date: NaiveDate,
    ) -> Result<SessionOutcome<Review>, SweepError> {
        let subject = request.asin.clone();
        let source = ReviewPageSource::new(self.client.clone(), request);
        self.execute(&source, "reviews", &subject, date).await
    }

    async fn execute<S>(
        &self,
        source: &S,
        prefix: &str,
        subject: &str,
        date: NaiveDate,
    ) -> Result<SessionOutcome<S::Item>, SweepError>
    where
        S: PageSource,
        S::Item: Tabular,
    {
        let started_at = Utc::now();
        let state = self.runner.run(source).await?;
        let finished_at = Utc::now();

        let mut summary =
            RunSummary::from_state(source.describe(), &state, started_at, finished_at);
        summary.config_hash = self.config_hash.clone();

        let items = state.into_items();
        let table = Table::from_records(&items);
        let directory = Path::new(&self.config.output.directory);
        let format = self.config.output.format;

        let export_path = if table.is_empty() {
            tracing::info!("No records found for {}, skipping export", summary.title);
            None
        } else {
            let file_name = export_file_name(prefix, subject, date, format);
            let path = write_export(&table, format, directory, &file_name)?;
            tracing::info!("Exported {} records to {}", table.row_count(), path.display());
            Some(path)
        };
        summary.export_path = export_path.clone();

        let report_path = if self.config.output.report {
            std::fs::create_dir_all(directory)?;
            let report_prefix = format!("{}-report", prefix);
            let path = directory.join(export_file_name(
                &report_prefix,
                subject,
                date,
                ExportFormat::Markdown,
            ));
            write_run_report(&summary, Some(&table), &path)?;
            tracing::info!("Run report written to {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(SessionOutcome {
            summary,
            items,
            export_path,
            report_path,
        })
    }
}
