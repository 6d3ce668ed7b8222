//! End-to-end review extraction runs against a mock backend

use crate::common::{create_test_config, reviews_page, run_date, PageMatcher};
use catalog_sweep::{Country, Phase, ReviewRequest, Session, SweepError, ValidationError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REVIEWS_PATH: &str = "/api/amazon/reviews";

#[tokio::test]
async fn test_reviews_are_aggregated_and_exported() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    for page in 1..=3 {
        Mock::given(method("POST"))
            .and(path(REVIEWS_PATH))
            .and(PageMatcher(page))
            .respond_with(reviews_page(page, 5))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 3, 0);
    let session = Session::new(config, None).unwrap();

    let request = ReviewRequest::new("b0c1234xyz", Country::parse("br").unwrap());
    let outcome = session.reviews(request, run_date()).await.unwrap();

    assert_eq!(outcome.summary.phase, Phase::Completed);
    assert_eq!(outcome.summary.title, "reviews B0C1234XYZ (BR)");
    assert_eq!(outcome.items.len(), 15);
    assert_eq!(outcome.items[0].id, "R1-1");
    assert_eq!(outcome.items[14].id, "R3-5");
    assert_eq!(outcome.items[0].rating, Some(5.0));
    assert!(outcome.items.iter().all(|r| r.verified));

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["asin"], "B0C1234XYZ");
    assert_eq!(body["sort"], "recent");

    let export_path = outcome.export_path.unwrap();
    assert_eq!(
        export_path.file_name().unwrap(),
        "reviews_b0c1234xyz_2026-10-17.csv"
    );
    let content = std::fs::read_to_string(export_path).unwrap();
    assert_eq!(content.lines().count(), 16);
    assert!(content
        .trim_start_matches('\u{FEFF}')
        .starts_with("Page,Review ID,Rating,Title,Body"));
}

#[tokio::test]
async fn test_malformed_page_is_recorded() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path(REVIEWS_PATH))
        .and(PageMatcher(1))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(REVIEWS_PATH))
        .and(PageMatcher(2))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "reviews": [{"reviewId": "R2-1", "text": "ok"}],
        })))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 2, 0);
    let session = Session::new(config, None).unwrap();

    let request = ReviewRequest::new("B0C1234XYZ", Country::default());
    let outcome = session.reviews(request, run_date()).await.unwrap();

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].page, 2);
    assert_eq!(outcome.errors().len(), 1);
    assert!(outcome.errors()[0].starts_with("Page 1: Failed to decode response"));
}

#[tokio::test]
async fn test_invalid_asin_sends_no_requests() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(reviews_page(1, 5))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 3, 0);
    let session = Session::new(config, None).unwrap();

    let result = session
        .reviews(ReviewRequest::new("B0C", Country::default()), run_date())
        .await;

    assert!(matches!(
        result,
        Err(SweepError::Validation(ValidationError::InvalidAsin(_)))
    ));
}
