//! Catalog-Sweep: sequential paginated aggregation over a marketplace search API
//!
//! This crate drives a fixed number of page requests against a backend search
//! (or review-extraction) endpoint, one page at a time, accumulating records and
//! per-page failures, and exports the result as a spreadsheet-compatible file.

pub mod client;
pub mod config;
pub mod export;
pub mod model;
pub mod session;
pub mod sweep;

use thiserror::Error;

/// Main error type for Catalog-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] export::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid API token: {0}")]
    InvalidToken(String),
}

/// Request validation errors
///
/// These block a run before any request is issued and are shown to the user
/// as-is, so the messages are written for people rather than logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("Invalid country code '{0}': expected two letters, e.g. BR or US")]
    InvalidCountry(String),

    #[error("Price bounds cannot be negative, got {0}")]
    NegativePrice(f64),

    #[error("Price bounds must be finite numbers, got {0}")]
    NonFinitePrice(f64),

    #[error("Minimum price {min} is greater than maximum price {max}")]
    InvalidPriceRange { min: f64, max: f64 },

    #[error("ASIN cannot be empty")]
    EmptyAsin,

    #[error("Invalid ASIN '{0}': expected 10 letters or digits")]
    InvalidAsin(String),
}

/// Result type alias for Catalog-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::Config;
pub use model::{Country, Product, Review, ReviewRequest, ReviewSort, SearchRequest, SearchSort};
pub use session::{Session, SessionOutcome};
pub use sweep::{Phase, Progress, RunEvent, RunSettings, RunState, StopSignal, SweepRunner};
