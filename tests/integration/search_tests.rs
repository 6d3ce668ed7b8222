//! End-to-end keyword search runs against a mock backend

use crate::common::{create_test_config, products_page, run_date, PageMatcher, TOKEN};
use catalog_sweep::export::ExportFormat;
use catalog_sweep::{Country, Phase, SearchRequest, Session, SweepError, ValidationError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/api/amazon/search";

async fn mount_products(server: &MockServer, pages: std::ops::RangeInclusive<u32>, per_page: u32) {
    for page in pages {
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(PageMatcher(page))
            .respond_with(products_page(page, per_page))
            .mount(server)
            .await;
    }
}

fn fone_bluetooth() -> SearchRequest {
    SearchRequest::new("fone bluetooth", Country::parse("BR").unwrap())
}

#[tokio::test]
async fn test_seven_pages_of_ten_export_seventy_rows() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_products(&mock_server, 1..=7, 10).await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 7, 0);
    let session = Session::new(config, Some(TOKEN.to_string())).unwrap();

    let outcome = session.search(fone_bluetooth(), run_date()).await.unwrap();

    assert_eq!(outcome.summary.phase, Phase::Completed);
    assert_eq!(outcome.summary.percent, 100.0);
    assert_eq!(outcome.items.len(), 70);
    assert!(outcome.errors().is_empty());

    // Page order, then within-page order
    let pages: Vec<u32> = outcome.items.iter().map(|p| p.page).collect();
    let mut sorted = pages.clone();
    sorted.sort();
    assert_eq!(pages, sorted);
    assert_eq!(outcome.items[0].asin, "P01I01XXXX");
    assert_eq!(outcome.items[69].asin, "P07I10XXXX");

    let export_path = outcome.export_path.expect("export should be written");
    assert_eq!(
        export_path,
        out_dir.path().join("search_fone-bluetooth_2026-10-17.csv")
    );

    let content = std::fs::read_to_string(&export_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 71);
    assert!(lines[0].trim_start_matches('\u{FEFF}').starts_with("Page,ASIN,Title,Price"));
    assert!(lines[1].starts_with("1,P01I01XXXX,Fone Bluetooth 1-1,99.90,BRL,4.5"));
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_products(&mock_server, 1..=3, 4).await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 3, 0);
    let session = Session::new(config, None).unwrap();

    let first = session.search(fone_bluetooth(), run_date()).await.unwrap();
    let first_export = std::fs::read(first.export_path.as_ref().unwrap()).unwrap();

    let second = session.search(fone_bluetooth(), run_date()).await.unwrap();
    let second_export = std::fs::read(second.export_path.as_ref().unwrap()).unwrap();

    assert_eq!(first.items, second.items);
    assert_eq!(first.export_path, second.export_path);
    assert_eq!(first_export, second_export);
}

#[tokio::test]
async fn test_failed_page_is_recorded_and_run_continues() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_products(&mock_server, 1..=2, 10).await;
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(PageMatcher(3))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "upstream unavailable"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_products(&mock_server, 4..=7, 10).await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 7, 0);
    let session = Session::new(config, None).unwrap();

    let outcome = session.search(fone_bluetooth(), run_date()).await.unwrap();

    assert_eq!(outcome.summary.phase, Phase::Completed);
    assert_eq!(outcome.summary.pages_completed, 7);
    assert_eq!(outcome.items.len(), 60);
    assert_eq!(outcome.errors().len(), 1);
    assert!(outcome.errors()[0].starts_with("Page 3: "));
    assert!(outcome.errors()[0].contains("upstream unavailable"));
    assert!(outcome.items.iter().all(|p| p.page != 3));

    let content = std::fs::read_to_string(outcome.export_path.unwrap()).unwrap();
    assert_eq!(content.lines().count(), 61);
}

#[tokio::test]
async fn test_failure_envelope_is_a_page_error() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_products(&mock_server, 1..=1, 5).await;
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(PageMatcher(2))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "quota exceeded",
        })))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 2, 0);
    let session = Session::new(config, None).unwrap();

    let outcome = session.search(fone_bluetooth(), run_date()).await.unwrap();

    assert_eq!(outcome.items.len(), 5);
    assert_eq!(outcome.errors(), ["Page 2: API error: quota exceeded".to_string()]);
}

#[tokio::test]
async fn test_bearer_token_and_payload_are_sent() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .respond_with(products_page(1, 2))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 2, 0);
    let session = Session::new(config, Some(TOKEN.to_string())).unwrap();

    let request = fone_bluetooth()
        .with_price_range(Some(50.0), Some(300.0))
        .with_prime_only(true);
    let outcome = session.search(request, run_date()).await.unwrap();
    assert!(outcome.errors().is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(body["query"], "fone bluetooth");
    assert_eq!(body["country"], "BR");
    assert_eq!(body["sort"], "relevance");
    assert_eq!(body["minPrice"], 50.0);
    assert_eq!(body["maxPrice"], 300.0);
    assert_eq!(body["primeOnly"], true);
    assert_eq!(body["page"], 2);
    assert!(body.get("brand").is_none());
}

#[tokio::test]
async fn test_empty_query_sends_no_requests() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(products_page(1, 10))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 7, 0);
    let session = Session::new(config, None).unwrap();

    let request = SearchRequest::new("   ", Country::default());
    let result = session.search(request, run_date()).await;

    assert!(matches!(
        result,
        Err(SweepError::Validation(ValidationError::EmptyQuery))
    ));
    assert!(std::fs::read_dir(out_dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_empty_results_write_no_export() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    let export_dir = out_dir.path().join("exports");

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "products": [] },
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &export_dir, 3, 0);
    let session = Session::new(config, None).unwrap();

    let outcome = session.search(fone_bluetooth(), run_date()).await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.summary.phase, Phase::Completed);
    assert!(outcome.errors().is_empty());
    assert!(outcome.export_path.is_none());
    assert!(!export_dir.exists());
}

#[tokio::test]
async fn test_stop_between_pages_ends_run_early() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_products(&mock_server, 1..=7, 10).await;

    let config = create_test_config(&mock_server.uri(), out_dir.path(), 7, 500);
    let session = Session::new(config, None).unwrap();

    let stop = session.stop_signal();
    let mut progress = session.subscribe();
    let stopper = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            if progress.borrow_and_update().current_page >= 1 {
                stop.stop();
                break;
            }
        }
    });

    let outcome = session.search(fone_bluetooth(), run_date()).await.unwrap();
    stopper.await.unwrap();

    assert_eq!(outcome.summary.phase, Phase::Stopped);
    assert_eq!(outcome.summary.pages_completed, 1);
    assert_eq!(outcome.items.len(), 10);
    assert!(outcome.errors().is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    // Partial results are still exported
    let content = std::fs::read_to_string(outcome.export_path.unwrap()).unwrap();
    assert_eq!(content.lines().count(), 11);
}

#[tokio::test]
async fn test_markdown_export_and_report() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_products(&mock_server, 1..=2, 3).await;

    let mut config = create_test_config(&mock_server.uri(), out_dir.path(), 2, 0);
    config.output.format = ExportFormat::Markdown;
    config.output.report = true;
    let session = Session::new(config, None)
        .unwrap()
        .with_config_hash("cafebabe");

    let outcome = session.search(fone_bluetooth(), run_date()).await.unwrap();

    let export_path = outcome.export_path.unwrap();
    assert_eq!(
        export_path.file_name().unwrap(),
        "search_fone-bluetooth_2026-10-17.md"
    );
    let table = std::fs::read_to_string(&export_path).unwrap();
    assert!(table.starts_with("| Page | ASIN | Title |"));
    assert_eq!(table.lines().count(), 8);

    let report_path = outcome.report_path.unwrap();
    assert_eq!(
        report_path.file_name().unwrap(),
        "search-report_fone-bluetooth_2026-10-17.md"
    );
    let report = std::fs::read_to_string(report_path).unwrap();
    assert!(report.contains("# Catalog-Sweep Run Report"));
    assert!(report.contains("- **Config Hash**: cafebabe"));
    assert!(report.contains("| Records | 6 |"));
}
