use super::{lenient_f64, lenient_u32};
use serde::{Deserialize, Serialize};

/// A product listing returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Empty when the listing carried no ASIN; such listings are dropped
    #[serde(default)]
    pub asin: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,

    #[serde(default, alias = "review_count", alias = "reviews", deserialize_with = "lenient_u32")]
    pub review_count: Option<u32>,

    #[serde(default, alias = "is_best_seller", alias = "bestSeller")]
    pub is_best_seller: bool,

    #[serde(default, alias = "is_amazon_choice", alias = "amazonChoice")]
    pub is_amazon_choice: bool,

    #[serde(default, alias = "is_prime", alias = "prime")]
    pub is_prime: bool,

    #[serde(default, alias = "image_url", alias = "image", alias = "thumbnail")]
    pub image_url: Option<String>,

    /// Page of the run this product was fetched on (1-based)
    #[serde(default)]
    pub page: u32,
}
