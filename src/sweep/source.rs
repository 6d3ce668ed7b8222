use crate::client::ApiClient;
use crate::model::{Product, Review, ReviewRequest, SearchRequest};
use crate::{SweepError, ValidationError};
use async_trait::async_trait;

/// A paginated endpoint the runner can walk page by page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Record type returned by one page
    type Item: Send;

    /// Fetches one page (1-based)
    async fn fetch_page(&self, page: u32) -> Result<Vec<Self::Item>, SweepError>;

    /// Checks the run parameters before the first request
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Short description for logs and reports
    fn describe(&self) -> String;
}

/// Keyword search pages for one `SearchRequest`
#[derive(Debug, Clone)]
pub struct SearchPageSource {
    client: ApiClient,
    request: SearchRequest,
}

impl SearchPageSource {
    pub fn new(client: ApiClient, request: SearchRequest) -> Self {
        Self { client, request }
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }
}

#[async_trait]
impl PageSource for SearchPageSource {
    type Item = Product;

    async fn fetch_page(&self, page: u32) -> Result<Vec<Product>, SweepError> {
        self.client.search_products(&self.request, page).await
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.request.validate()
    }

    fn describe(&self) -> String {
        format!(
            "search \"{}\" ({})",
            self.request.query, self.request.country
        )
    }
}

/// Review pages for one product
#[derive(Debug, Clone)]
pub struct ReviewPageSource {
    client: ApiClient,
    request: ReviewRequest,
}

impl ReviewPageSource {
    pub fn new(client: ApiClient, request: ReviewRequest) -> Self {
        Self { client, request }
    }

    pub fn request(&self) -> &ReviewRequest {
        &self.request
    }
}

#[async_trait]
impl PageSource for ReviewPageSource {
    type Item = Review;

    async fn fetch_page(&self, page: u32) -> Result<Vec<Review>, SweepError> {
        self.client.fetch_reviews(&self.request, page).await
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.request.validate()
    }

    fn describe(&self) -> String {
        format!("reviews {} ({})", self.request.asin, self.request.country)
    }
}
