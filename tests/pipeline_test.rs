//! End-to-end pipeline runs against a local site.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::SocketAddr;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::routing::get;
use sitesift::core::{ContentContext, SearchRequest, SearchStatus};
use sitesift::fetch::{FetchConfig, FetchSource, HttpFetcher};
use sitesift::pipeline::Pipeline;
use sitesift::search::ScoringTier;
use sitesift::storage::{SqliteStorage, Storage};
use tempfile::TempDir;

const HELP_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Help</title><style>body { color: red; }</style></head>
<body>
<header><a href="/">Acme</a></header>
<nav><ul><li>Home</li><li>Pricing</li></ul></nav>
<main>
  <h1>Password help</h1>
  <p>To reset your password, open Settings and choose Security. Enter the code we
     email you and pick a new password. Codes expire after fifteen minutes.</p>
  <p>If you lost access to your email address, contact support and we will verify
     your identity by phone before changing the password on the account.</p>
  <p>Accounts lock after five failed attempts; wait one hour or ask support to
     unlock the account early. Locked accounts keep all of their saved data.</p>
  <!-- hidden note -->
  <script>trackPageView();</script>
</main>
<footer>&copy; 2024 Acme &amp; Co. All rights reserved.</footer>
</body>
</html>"#;

const SHELL_PAGE: &str = "<html><div id=\"app\"></div><script src=\"/bundle.js\"></script></html>";

const READER_TEXT: &str = "Release notes\n\nVersion 2 adds offline sync, faster search across \
     shared folders, and a redesigned settings screen for teams.";

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn site() -> SocketAddr {
    let app = Router::new()
        .route(
            "/help",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], HELP_PAGE) }),
        )
        .route(
            "/app",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], SHELL_PAGE) }),
        )
        .route(
            "/down",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
    serve(app).await
}

async fn reader() -> SocketAddr {
    serve(Router::new().fallback(|| async { READER_TEXT })).await
}

fn open_store() -> (SqliteStorage, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let mut storage = SqliteStorage::open(dir.path().join("sitesift.db")).expect("open");
    storage.init().expect("init");
    (storage, dir)
}

#[tokio::test]
async fn ranks_relevant_passage_first() {
    let site = site().await;
    let pipeline =
        Pipeline::new(HttpFetcher::new(&FetchConfig::new().with_reader_enabled(false)).unwrap());

    let request = SearchRequest::new(format!("http://{site}/help"), "how to reset password")
        .with_max_tokens_per_chunk(40);
    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.tier, Some(ScoringTier::Strict));
    assert_eq!(outcome.fetch_source, FetchSource::Primary);
    assert!(outcome.total_chunks >= 2);
    assert!(outcome.results_count <= 10);
    assert!(outcome.chunks[0].content.contains("reset your password"));

    let all_text: String = outcome
        .chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert!(!all_text.contains("trackPageView"));
    assert!(!all_text.contains("hidden note"));
    assert!(!all_text.contains("Home"));
    assert!(!all_text.contains("rights reserved"));

    for pair in outcome.chunks.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
}

#[tokio::test]
async fn unmatched_query_returns_longest_chunks() {
    let site = site().await;
    let pipeline =
        Pipeline::new(HttpFetcher::new(&FetchConfig::new().with_reader_enabled(false)).unwrap());

    // Every query word is two characters or shorter, so nothing scores
    let request = SearchRequest::new(format!("http://{site}/help"), "zq xy")
        .with_max_tokens_per_chunk(20);
    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.tier, Some(ScoringTier::Longest));
    assert!(outcome.results_count <= 3);
    assert!(
        outcome
            .chunks
            .iter()
            .all(|c| (c.relevance_score - 0.1).abs() < f64::EPSILON)
    );
}

#[tokio::test]
async fn tracked_search_persists_results() {
    let site = site().await;
    let pipeline =
        Pipeline::new(HttpFetcher::new(&FetchConfig::new().with_reader_enabled(false)).unwrap());
    let (mut storage, _dir) = open_store();

    let request = SearchRequest::new(format!("http://{site}/help"), "account locked")
        .with_max_results(2)
        .with_max_tokens_per_chunk(30);
    let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
    let outcome = result.unwrap();

    let record = storage.get_search(id).unwrap().unwrap();
    assert_eq!(record.status, SearchStatus::Completed);
    assert_eq!(record.results_count, Some(outcome.results_count));
    assert_eq!(record.total_chunks, Some(outcome.total_chunks));
    assert_eq!(record.max_results, 2);
    assert!(record.processing_time_ms.is_some());

    let stored = storage.get_results(id).unwrap();
    assert_eq!(stored, outcome.chunks);
    assert!(stored.len() <= 2);
}

#[tokio::test]
async fn tracked_search_records_fetch_failure() {
    let site = site().await;
    let pipeline =
        Pipeline::new(HttpFetcher::new(&FetchConfig::new().with_reader_enabled(false)).unwrap());
    let (mut storage, _dir) = open_store();

    let request = SearchRequest::new(format!("http://{site}/down"), "status");
    let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
    assert!(result.is_err());

    let record = storage.get_search(id).unwrap().unwrap();
    assert_eq!(record.status, SearchStatus::Failed);
    assert!(record.error_message.unwrap().contains("503"));
    assert!(storage.get_results(id).unwrap().is_empty());

    let stats = storage.stats().unwrap();
    assert_eq!(stats.failed_count, 1);
}

#[tokio::test]
async fn script_rendered_page_uses_reader() {
    let site = site().await;
    let reader = reader().await;
    let config = FetchConfig::new().with_reader_endpoint(format!("http://{reader}/"));
    let pipeline = Pipeline::new(HttpFetcher::new(&config).unwrap());
    let (mut storage, _dir) = open_store();

    let request = SearchRequest::new(format!("http://{site}/app"), "offline sync");
    let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
    let outcome = result.unwrap();

    assert_eq!(outcome.fetch_source, FetchSource::Reader);
    assert_eq!(outcome.tier, Some(ScoringTier::Strict));
    assert!(outcome.chunks[0].content.contains("offline sync"));

    let record = storage.get_search(id).unwrap().unwrap();
    assert_eq!(record.fetch_source.as_deref(), Some("reader"));
    assert_eq!(record.scoring_tier.as_deref(), Some("strict"));
}

#[tokio::test]
async fn empty_page_completes_with_zero_results() {
    let app = Router::new().route(
        "/",
        get(|| async {
            (
                [(header::CONTENT_TYPE, "text/html")],
                "<html><body><script>render()</script></body></html>",
            )
        }),
    );
    let site = serve(app).await;
    let pipeline =
        Pipeline::new(HttpFetcher::new(&FetchConfig::new().with_reader_enabled(false)).unwrap());
    let (mut storage, _dir) = open_store();

    let request = SearchRequest::new(format!("http://{site}/"), "anything");
    let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
    let outcome = result.unwrap();

    assert_eq!(outcome.results_count, 0);
    assert_eq!(outcome.tier, None);
    let record = storage.get_search(id).unwrap().unwrap();
    assert_eq!(record.status, SearchStatus::Completed);
    assert_eq!(record.results_count, Some(0));
}

#[tokio::test]
async fn chunks_carry_context_labels() {
    let site = site().await;
    let pipeline =
        Pipeline::new(HttpFetcher::new(&FetchConfig::new().with_reader_enabled(false)).unwrap());

    let request =
        SearchRequest::new(format!("http://{site}/help"), "support").with_max_tokens_per_chunk(500);
    let outcome = pipeline.run(&request).await.unwrap();

    // One long chunk mentioning email and phone
    assert_eq!(outcome.total_chunks, 1);
    assert_eq!(outcome.chunks[0].content_context, ContentContext::Contact);
}
