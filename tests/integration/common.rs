//! Shared fixtures for the integration tests

use catalog_sweep::Config;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::{Match, Request, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// Builds a config pointing at the mock server with no delay between pages
pub fn create_test_config(base_url: &str, output_dir: &Path, pages: u32, delay_ms: u64) -> Config {
    let toml = format!(
        r#"
[api]
base-url = "{}"

[user-agent]
name = "TestSweep"
version = "1.0.0"

[run]
pages = {}
delay-ms = {}

[output]
directory = "{}"
"#,
        base_url,
        pages,
        delay_ms,
        output_dir.display()
    );

    toml::from_str(&toml).expect("Failed to parse test config")
}

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

/// Matches requests whose JSON body carries the given page number
pub struct PageMatcher(pub u32);

impl Match for PageMatcher {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body.get("page").and_then(Value::as_u64))
            == Some(u64::from(self.0))
    }
}

/// Ten products for one page; ASINs encode page and position
pub fn products_page(page: u32, count: u32) -> ResponseTemplate {
    let products: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "asin": format!("P{:02}I{:02}XXXX", page, i),
                "title": format!("Fone Bluetooth {}-{}", page, i),
                "price": 99.9,
                "currency": "BRL",
                "rating": 4.5,
                "reviewCount": 100 + i,
                "isPrime": i % 2 == 0,
            })
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": { "products": products },
    }))
}

pub fn reviews_page(page: u32, count: u32) -> ResponseTemplate {
    let reviews: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "reviewId": format!("R{}-{}", page, i),
                "title": "Muito bom",
                "text": format!("Review {} on page {}", i, page),
                "rating": "5,0 de 5 estrelas",
                "profileName": "Cliente",
                "verifiedPurchase": true,
            })
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "reviews": reviews,
    }))
}
