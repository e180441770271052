//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small guide site and run the full
//! cycle end-to-end: crawl through the HTTP fetcher, rank, export.

use guide_scraper::config::{Config, CrawlerConfig};
use guide_scraper::crawler::crawl;
use guide_scraper::output::{export_all, ExportFormat};
use guide_scraper::{rank, Field, Record, SortKey};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, max_retries: Option<u32>) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            parallelism: 4,
            request_delay_ms: 0,
            max_retries,
            ..CrawlerConfig::default()
        },
        ..Config::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn listing_page(guides: &[&str], last_page: u32) -> ResponseTemplate {
    let mut body = String::from("<html><body><div class=\"guides\">");
    for guide in guides {
        body.push_str(&format!("<a href=\"/guide/{}\">{}</a>", guide, guide));
    }
    body.push_str("</div><ul class=\"pagination\"><li class=\"active\"><a>1</a></li>");
    for page in 2..=last_page {
        body.push_str(&format!("<li><a href=\"/guides/popular?page={0}\">{0}</a></li>", page));
    }
    body.push_str("</ul></body></html>");
    html(body)
}

fn guide_page(name: &str, difficulty: &str, rarity: &str) -> ResponseTemplate {
    html(format!(
        r#"<html><body>
            <div class="title-bar"><h3><a href="/guides">Guides</a> <a href="/trophies/x">{name}</a></h3></div>
            <div class="overview-info">
                <span class="tag"><span class="typo-top">{difficulty}</span><span>Difficulty</span></span>
                <span class="tag"><span class="typo-top">1</span><span>Playthroughs</span></span>
                <span class="tag"><span class="typo-top">10</span><span>Hours</span></span>
            </div>
            <div class="platforms"><span>PS5</span></div>
            <table><tr>
                <td><img alt="Platinum"></td>
                <td>{name} Platinum</td>
                <td><span><span class="typo-top">{rarity}</span></span></td>
                <td>icon</td>
            </tr></table>
        </body></html>"#
    ))
}

async fn mount_listing(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/guides/popular"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_guide(server: &MockServer, slug: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/guide/{}", slug)))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_rank_and_export() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, 1, listing_page(&["1-alpha", "2-beta"], 2)).await;
    mount_listing(&mock_server, 2, listing_page(&["3-gamma"], 2)).await;

    // First request for alpha fails; the retry must still yield one record
    Mock::given(method("GET"))
        .and(path("/guide/1-alpha"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_guide(&mock_server, "1-alpha", guide_page("Alpha", "7/10", "40.1%")).await;
    mount_guide(&mock_server, "2-beta", guide_page("Beta", "3/10", "12.5%")).await;
    mount_guide(&mock_server, "3-gamma", guide_page("Gamma", "", "1.2%")).await;

    let config = create_test_config(&base_url, None);
    let outcome = crawl(&config).await.expect("crawl failed");

    assert_eq!(outcome.max_page, 2);
    assert_eq!(outcome.listing_pages, 2);
    assert_eq!(outcome.detail_pages, 3);
    assert_eq!(outcome.failed_attempts, 1);
    assert_eq!(outcome.records.len(), 3);

    let alpha = outcome
        .records
        .iter()
        .find(|record| record.name == "Alpha")
        .expect("alpha record");
    assert_eq!(alpha.link, format!("{}/guide/1-alpha", base_url));
    assert_eq!(alpha.time_needed, "10");
    assert_eq!(alpha.platinum_rarity, "40.1%");
    assert_eq!(alpha.platforms, "PS5");

    let keys = vec![SortKey::ascending(Field::Difficulty)];
    let ranked = Arc::new(rank(outcome.records, &keys));

    let output_dir = TempDir::new().unwrap();
    let summary = export_all(Arc::clone(&ranked), &ExportFormat::ALL, output_dir.path()).await;
    assert!(summary.failed.is_empty());
    assert_eq!(summary.written.len(), 3);

    let json = std::fs::read_to_string(output_dir.path().join("guide_data.json")).unwrap();
    let exported: Vec<Record> = serde_json::from_str(&json).unwrap();
    let names: Vec<&str> = exported.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["Beta", "Alpha", "Gamma"]);

    let csv = std::fs::read_to_string(output_dir.path().join("guide_data.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);

    let md = std::fs::read_to_string(output_dir.path().join("guide_data.md")).unwrap();
    assert!(md.contains(&format!("[Beta]({}/guide/2-beta)", base_url)));
}

#[tokio::test]
async fn test_non_html_response_is_retried() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, 1, listing_page(&["1-alpha"], 1)).await;
    Mock::given(method("GET"))
        .and(path("/guide/1-alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_guide(&mock_server, "1-alpha", guide_page("Alpha", "2/10", "5%")).await;

    let config = create_test_config(&mock_server.uri(), None);
    let outcome = crawl(&config).await.expect("crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].difficulty, "2/10");
    assert_eq!(outcome.failed_attempts, 1);
}

#[tokio::test]
async fn test_capped_retry_gives_up_on_missing_guide() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, 1, listing_page(&["1-alpha", "404-missing"], 1)).await;
    mount_guide(&mock_server, "1-alpha", guide_page("Alpha", "2/10", "5%")).await;
    Mock::given(method("GET"))
        .and(path("/guide/404-missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), Some(1));
    let outcome = crawl(&config).await.expect("crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(
        outcome.abandoned,
        vec![format!("{}/guide/404-missing", mock_server.uri())]
    );
}

#[tokio::test]
async fn test_request_delay_spaces_requests_to_one_origin() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, 1, listing_page(&["1-alpha", "2-beta"], 1)).await;
    mount_guide(&mock_server, "1-alpha", guide_page("Alpha", "2/10", "5%")).await;
    mount_guide(&mock_server, "2-beta", guide_page("Beta", "3/10", "6%")).await;

    let mut config = create_test_config(&mock_server.uri(), None);
    config.crawler.request_delay_ms = 200;

    let start = Instant::now();
    let outcome = crawl(&config).await.expect("crawl failed");

    assert_eq!(outcome.records.len(), 2);
    // Three requests to one origin need at least two delays
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_empty_listing_exports_empty_documents() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, listing_page(&[], 1)).await;

    let config = create_test_config(&mock_server.uri(), None);
    let outcome = crawl(&config).await.expect("crawl failed");
    assert!(outcome.records.is_empty());

    let output_dir = TempDir::new().unwrap();
    let ranked = Arc::new(rank(outcome.records, &[]));
    let summary = export_all(ranked, &ExportFormat::ALL, output_dir.path()).await;
    assert!(summary.failed.is_empty());

    let json = std::fs::read_to_string(output_dir.path().join("guide_data.json")).unwrap();
    assert_eq!(json.trim(), "[]");
}
