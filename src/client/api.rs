use crate::client::envelope::{
    error_message, Envelope, ReviewsEnvelope, ReviewsPayload, SearchEnvelope, SearchPayload,
};
use crate::config::{ApiConfig, UserAgentConfig};
use crate::model::{Product, Review, ReviewRequest, SearchRequest};
use crate::{ConfigError, SweepError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Authenticated client for the backend search and review endpoints
///
/// The bearer token is handed in at construction time and baked into the
/// default headers, so call sites never look it up themselves.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    search_url: String,
    reviews_url: String,
}

impl ApiClient {
    /// Creates a client for the configured backend
    ///
    /// # Arguments
    ///
    /// * `api` - Backend URL, endpoint paths and timeouts
    /// * `user_agent` - User-Agent identification
    /// * `token` - Optional bearer token sent with every request
    ///
    /// # Returns
    ///
    /// * `Ok(ApiClient)` - Ready to issue requests
    /// * `Err(SweepError)` - The token is not a valid header value or the
    ///   underlying HTTP client could not be built
    pub fn new(
        api: &ApiConfig,
        user_agent: &UserAgentConfig,
        token: Option<&str>,
    ) -> Result<Self, SweepError> {
        let client = build_http_client(api, user_agent, token)?;
        let base = api.base_url.trim_end_matches('/');

        Ok(Self {
            client,
            search_url: format!("{}{}", base, api.search_path),
            reviews_url: format!("{}{}", base, api.reviews_path),
        })
    }

    /// Fetches one page of keyword search results
    ///
    /// Every returned product is tagged with `page`.
    pub async fn search_products(
        &self,
        request: &SearchRequest,
        page: u32,
    ) -> Result<Vec<Product>, SweepError> {
        let payload = SearchPayload {
            query: &request.query,
            country: &request.country,
            sort: request.sort,
            min_price: request.min_price,
            max_price: request.max_price,
            brand: request.brand.as_deref(),
            prime_only: request.prime_only,
            page,
        };

        let mut products = self
            .post_envelope::<_, SearchEnvelope>(&self.search_url, &payload)
            .await?;
        for product in &mut products {
            product.page = page;
        }

        tracing::debug!(
            "Search page {} for '{}' returned {} products",
            page,
            request.query,
            products.len()
        );
        Ok(products)
    }

    /// Fetches one page of reviews for a product
    pub async fn fetch_reviews(
        &self,
        request: &ReviewRequest,
        page: u32,
    ) -> Result<Vec<Review>, SweepError> {
        let payload = ReviewsPayload {
            asin: &request.asin,
            page,
            country: &request.country,
            sort: request.sort,
        };

        let mut reviews = self
            .post_envelope::<_, ReviewsEnvelope>(&self.reviews_url, &payload)
            .await?;
        for review in &mut reviews {
            review.page = page;
        }

        tracing::debug!(
            "Review page {} for {} returned {} reviews",
            page,
            request.asin,
            reviews.len()
        );
        Ok(reviews)
    }

    /// POSTs a JSON body and unwraps the response envelope
    ///
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout | `Timeout` |
    /// | Connection / transport failure | `Http` |
    /// | Non-2xx status | `Status` with the body's error message |
    /// | Body is not the expected JSON | `Decode` |
    /// | `success: false` | `Api` |
    async fn post_envelope<B, E>(&self, url: &str, body: &B) -> Result<Vec<E::Item>, SweepError>
    where
        B: Serialize + ?Sized,
        E: Envelope + DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(SweepError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        let envelope: E = serde_json::from_slice(&bytes).map_err(|e| SweepError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        envelope
            .into_items()
            .map_err(|message| SweepError::Api { message })
    }
}

/// Builds an HTTP client with the auth and identification headers installed
///
/// User agent format: `Name/Version`.
pub fn build_http_client(
    api: &ApiConfig,
    user_agent: &UserAgentConfig,
    token: Option<&str>,
) -> Result<Client, SweepError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", token.trim())).map_err(|_| {
                ConfigError::InvalidToken(
                    "token contains characters not allowed in an HTTP header".to_string(),
                )
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    let client = Client::builder()
        .default_headers(headers)
        .user_agent(format!("{}/{}", user_agent.name, user_agent.version))
        .timeout(Duration::from_secs(api.timeout_secs))
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> SweepError {
    if error.is_timeout() {
        SweepError::Timeout {
            url: url.to_string(),
        }
    } else {
        SweepError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_api() -> ApiConfig {
        ApiConfig {
            base_url: "https://erp.example.com/".to_string(),
            search_path: "/api/amazon/search".to_string(),
            reviews_path: "/api/amazon/reviews".to_string(),
            token_env: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let client = ApiClient::new(&create_test_api(), &UserAgentConfig::default(), None).unwrap();
        assert_eq!(client.search_url, "https://erp.example.com/api/amazon/search");
        assert_eq!(client.reviews_url, "https://erp.example.com/api/amazon/reviews");
    }

    #[test]
    fn test_build_http_client_with_token() {
        let client =
            build_http_client(&create_test_api(), &UserAgentConfig::default(), Some("abc.def"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = build_http_client(
            &create_test_api(),
            &UserAgentConfig::default(),
            Some("bad\ntoken"),
        );
        assert!(matches!(
            result,
            Err(SweepError::Config(ConfigError::InvalidToken(_)))
        ));
    }
}
