use crate::export::ExportFormat;
use serde::Deserialize;

/// Main configuration structure for Catalog-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. "https://erp.example.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the keyword search endpoint
    #[serde(rename = "search-path", default = "default_search_path")]
    pub search_path: String,

    /// Path of the review-extraction endpoint
    #[serde(rename = "reviews-path", default = "default_reviews_path")]
    pub reviews_path: String,

    /// Name of the environment variable holding the bearer token
    #[serde(rename = "token-env", default)]
    pub token_env: Option<String>,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version sent in the User-Agent header
    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

/// Run pacing configuration
///
/// The page count and delay exist to stay under the upstream rate limit;
/// neither value is an invariant of the aggregation itself.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Number of pages requested per run
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Delay between consecutive page requests (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory export files are written to
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Export file format
    #[serde(default)]
    pub format: ExportFormat,

    /// Also write a markdown run report next to the export
    #[serde(default)]
    pub report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            format: ExportFormat::default(),
            report: false,
        }
    }
}

fn default_search_path() -> String {
    "/api/amazon/search".to_string()
}

fn default_reviews_path() -> String {
    "/api/amazon/reviews".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_agent_name() -> String {
    "catalog-sweep".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_pages() -> u32 {
    7
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_output_directory() -> String {
    "./exports".to_string()
}
