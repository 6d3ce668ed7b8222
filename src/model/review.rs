use super::{lenient_f64, lenient_u32};
use serde::{Deserialize, Serialize};

/// A customer review returned by the review-extraction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, alias = "reviewId", alias = "review_id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, alias = "text", alias = "content")]
    pub body: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,

    #[serde(default, alias = "profileName", alias = "name")]
    pub author: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, alias = "verifiedPurchase", alias = "verified_purchase")]
    pub verified: bool,

    #[serde(
        default,
        alias = "helpful_votes",
        alias = "helpfulCount",
        deserialize_with = "lenient_u32"
    )]
    pub helpful_votes: Option<u32>,

    #[serde(default)]
    pub page: u32,
}
