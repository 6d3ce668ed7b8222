//! HTTP resource client for the backend API
//!
//! This module handles:
//! - Building the HTTP client with bearer auth and user agent headers
//! - POSTing search and review page requests
//! - Unwrapping `{success, ...}` envelopes and JSON error bodies

mod api;
mod envelope;

pub use api::{build_http_client, ApiClient};
