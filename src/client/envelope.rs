//! Wire shapes of the backend API
//!
//! Request payloads are camelCase JSON. Responses wrap records in a
//! `{success, ...}` envelope; failures carry an `error` (or `message`) string.

use crate::model::{Country, Product, Review, ReviewSort, SearchSort};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Longest plain-text error body surfaced verbatim
const MAX_PLAIN_ERROR_LEN: usize = 200;

/// JSON body of one search page request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPayload<'a> {
    pub query: &'a str,
    pub country: &'a Country,
    pub sort: SearchSort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<&'a str>,
    pub prime_only: bool,
    pub page: u32,
}

/// JSON body of one review page request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewsPayload<'a> {
    pub asin: &'a str,
    pub page: u32,
    pub country: &'a Country,
    pub sort: ReviewSort,
}

/// A response envelope that either yields records or a failure message
pub(crate) trait Envelope {
    type Item;

    fn into_items(self) -> Result<Vec<Self::Item>, String>;
}

/// `{success: true, data: {products: [...]}}` or `{success: false, error}`
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<SearchData>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    products: Vec<Product>,
}

impl Envelope for SearchEnvelope {
    type Item = Product;

    fn into_items(self) -> Result<Vec<Product>, String> {
        if !self.success {
            return Err(failure_message(self.error, self.message));
        }
        let mut products = self.data.map(|d| d.products).unwrap_or_default();
        let received = products.len();
        products.retain(|p| !p.asin.trim().is_empty());
        if products.len() < received {
            tracing::debug!("Dropped {} listings without an ASIN", received - products.len());
        }
        Ok(products)
    }
}

/// `{success: true, reviews: [...]}` or `{success: false, error}`
#[derive(Debug, Deserialize)]
pub(crate) struct ReviewsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope for ReviewsEnvelope {
    type Item = Review;

    fn into_items(self) -> Result<Vec<Review>, String> {
        if !self.success {
            return Err(failure_message(self.error, self.message));
        }
        Ok(self.reviews)
    }
}

fn failure_message(error: Option<String>, message: Option<String>) -> String {
    error
        .or(message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "backend reported failure without a message".to_string())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts a human-readable message from a non-2xx response body
///
/// Prefers the JSON `error`/`message` field, then a short plain-text body,
/// then the status reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed
            .error
            .or(parsed.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
        {
            return message;
        }
    }

    let body = body.trim();
    if !body.is_empty()
        && body.len() <= MAX_PLAIN_ERROR_LEN
        && !body.starts_with('<')
        && !body.starts_with('{')
    {
        return body.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
