//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the publisher's site and run
//! the full four-level crawl end-to-end against a temporary directory.

use statfi_crawler::config::Config;
use statfi_crawler::crawler::{crawl, Coordinator};
use statfi_crawler::storage::StorageError;
use statfi_crawler::CrawlError;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FI: &str = "/til/vtp/2023/vtp_2023_tie_001_fi.html";
const EN: &str = "/til/vtp/2023/vtp_2023_tie_001_en.html";
const SV: &str = "/til/vtp/2023/vtp_2023_tie_001_sv.html";
const TAU_FI: &str = "/til/vtp/2023/vtp_2023_tau_001_fi.html";
const TAU_EN: &str = "/til/vtp/2023/vtp_2023_tau_001_en.html";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, stagger_ms: u64, cache_index_pages: bool) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.stagger_ms = stagger_ms;
    config.crawler.cache_index_pages = cache_index_pages;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Tilastokeskus</title></head><body><nav>menu</nav>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

fn content(body: &str) -> ResponseTemplate {
    html(&format!(r#"<div id="content">{}</div>"#, body))
}

async fn mount(server: &MockServer, at: &str, response: ResponseTemplate, times: Option<u64>) {
    let mock = Mock::given(method("GET")).and(path(at)).respond_with(response);
    let mock = match times {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

/// One dataset, one release, an appendix table each for fi and en
async fn mount_site(server: &MockServer, document_fetches: Option<u64>) {
    mount(
        server,
        "/til/aiheet.html",
        html(
            r#"<a href="/til/vtp/index.html">Kansantalouden tilinpito</a>
               <a href="/til/tietoa.html">Tietoa</a>"#,
        ),
        None,
    )
    .await;
    mount(
        server,
        "/til/vtp/tie.html",
        html(r#"<a href="2023/vtp_2023_tie_001_fi.html">Julkaisu 2023</a>"#),
        None,
    )
    .await;
    mount(
        server,
        FI,
        content(&format!(
            r#"<h1>Kansantalous</h1><a href="{}">Liitetaulukko 1</a><a href="{}">Appendix</a>"#,
            TAU_FI, TAU_EN
        )),
        document_fetches,
    )
    .await;
    mount(
        server,
        EN,
        content(r#"<h1>National accounts</h1><a href="vtp_2023_tau_001_en.html">Appendix table 1</a>"#),
        document_fetches,
    )
    .await;
    mount(server, SV, content("<h1>Nationalräkenskaper</h1>"), document_fetches).await;
    mount(server, TAU_FI, content("<table><tr><td>1</td></tr></table>"), document_fetches).await;
    mount(server, TAU_EN, content("<table><tr><td>one</td></tr></table>"), document_fetches).await;
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

fn stored(dir: &Path, key: &str) -> String {
    std::fs::read_to_string(dir.join(key)).unwrap_or_else(|_| panic!("{} not stored", key))
}

#[tokio::test]
async fn test_full_crawl_fetch_order_and_files() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, Some(1)).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 10, false);

    let mut coordinator =
        Coordinator::new(&config, dir.path()).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(
        requested_paths(&mock_server).await,
        vec![
            "/til/aiheet.html",
            "/til/vtp/tie.html",
            FI,
            TAU_FI,
            EN,
            TAU_EN,
            SV
        ]
    );

    assert_eq!(summary.datasets, 1);
    assert_eq!(summary.publications, 1);
    assert_eq!(summary.documents_stored, 5);
    assert_eq!(summary.requests_sent, 7);

    let fi = stored(dir.path(), "til_vtp_2023_vtp_2023_tie_001_fi.html");
    assert!(fi.starts_with(r#"<div id="content">"#));
    assert!(fi.contains("Kansantalous"));
    assert!(!fi.contains("menu"));
    assert!(stored(dir.path(), "til_vtp_2023_vtp_2023_tie_001_sv.html").contains("Nationalräkenskaper"));
    assert!(stored(dir.path(), "til_vtp_2023_vtp_2023_tau_001_en.html").contains("one"));

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 5);
}

#[tokio::test]
async fn test_rerun_fetches_no_documents() {
    let mock_server = MockServer::start().await;
    // Every document must be requested exactly once over both runs
    mount_site(&mock_server, Some(1)).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 0, false);

    crawl(&config, dir.path()).await.expect("First crawl failed");
    let first = stored(dir.path(), "til_vtp_2023_vtp_2023_tie_001_en.html");

    let summary = crawl(&config, dir.path()).await.expect("Second crawl failed");
    let second = stored(dir.path(), "til_vtp_2023_vtp_2023_tie_001_en.html");

    assert_eq!(first, second);
    assert_eq!(summary.documents_stored, 0);
    assert_eq!(summary.documents_cached, 5);
    assert_eq!(summary.requests_sent, 2);
    assert_eq!(requested_paths(&mock_server).await.len(), 9);
}

#[tokio::test]
async fn test_rerun_with_cached_index_pages_is_offline() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, Some(1)).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 0, true);

    crawl(&config, dir.path()).await.expect("First crawl failed");
    let requests_after_first = requested_paths(&mock_server).await.len();

    let summary = crawl(&config, dir.path()).await.expect("Second crawl failed");

    assert_eq!(requests_after_first, 7);
    assert_eq!(requested_paths(&mock_server).await.len(), 7);
    assert_eq!(summary.requests_sent, 0);
    assert!(dir.path().join("til_aiheet.html").exists());
    assert!(dir.path().join("til_vtp_tie.html").exists());
}

#[tokio::test]
async fn test_server_error_aborts_crawl() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/til/aiheet.html",
        html(r#"<a href="/til/vtp/index.html">vtp</a><a href="/til/kan/index.html">kan</a>"#),
        None,
    )
    .await;
    mount(
        &mock_server,
        "/til/vtp/tie.html",
        html(&format!(r#"<a href="{}">2023</a>"#, FI)),
        None,
    )
    .await;
    mount(&mock_server, FI, content("<h1>fi</h1>"), None).await;
    mount(&mock_server, EN, ResponseTemplate::new(500), None).await;
    // Never reached: the first failure ends the run
    mount(&mock_server, SV, content("<h1>sv</h1>"), Some(0)).await;
    mount(&mock_server, "/til/kan/tie.html", html(""), Some(0)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 0, false);

    let err = crawl(&config, dir.path()).await.unwrap_err();

    assert!(matches!(err, CrawlError::HttpStatus { status: 500, .. }));
    assert!(dir.path().join("til_vtp_2023_vtp_2023_tie_001_fi.html").exists());
    assert!(!dir.path().join("til_vtp_2023_vtp_2023_tie_001_en.html").exists());
}

#[tokio::test]
async fn test_missing_content_anchor_aborts_crawl() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/til/aiheet.html",
        html(r#"<a href="/til/vtp/index.html">vtp</a>"#),
        None,
    )
    .await;
    mount(
        &mock_server,
        "/til/vtp/tie.html",
        html(&format!(r#"<a href="{}">2023</a>"#, FI)),
        None,
    )
    .await;
    mount(&mock_server, FI, html("<p>moved</p>"), None).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 0, false);

    let err = crawl(&config, dir.path()).await.unwrap_err();

    assert!(matches!(err, CrawlError::MissingContent { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_requests_respect_stagger() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, None).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 40, false);

    let start = Instant::now();
    crawl(&config, dir.path()).await.expect("Crawl failed");

    // Seven requests means six full gaps
    assert!(start.elapsed() >= Duration::from_millis(6 * 40));
}

#[tokio::test]
async fn test_output_dir_must_exist() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", 0, false);

    let result = Coordinator::new(&config, &dir.path().join("missing"));

    assert!(matches!(
        result,
        Err(CrawlError::Storage(StorageError::NotADirectory(_)))
    ));
}

#[tokio::test]
async fn test_empty_topics_page_crawls_nothing() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/til/aiheet.html", html("<p>Huoltokatko</p>"), None).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), 0, false);

    let summary = crawl(&config, dir.path()).await.expect("Crawl failed");

    assert_eq!(summary.datasets, 0);
    assert_eq!(summary.requests_sent, 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
