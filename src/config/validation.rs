use crate::config::types::{ApiConfig, Config, OutputConfig, RunConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on pages per run
const MAX_PAGES: u32 = 100;

/// Upper bound on the inter-page delay (milliseconds)
const MAX_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_run_config(&config.run)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates backend API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    validate_endpoint_path("search-path", &config.search_path)?;
    validate_endpoint_path("reviews-path", &config.reviews_path)?;

    if let Some(name) = &config.token_env {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::Validation(format!(
                "token-env must be a variable name (letters, digits, underscores), got '{}'",
                name
            )));
        }
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates an endpoint path (must be absolute, no query string)
fn validate_endpoint_path(field: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must start with '/', got '{}'",
            field, path
        )));
    }

    if path.contains('?') || path.contains('#') || path.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain path, got '{}'",
            field, path
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() || config.version.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "user-agent version must be a non-empty token, got '{}'",
            config.version
        )));
    }

    Ok(())
}

/// Validates run pacing configuration
fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.pages < 1 || config.pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "pages must be between 1 and {}, got {}",
            MAX_PAGES, config.pages
        )));
    }

    if config.delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be <= {}ms, got {}ms",
            MAX_DELAY_MS, config.delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
