//! Search pipeline: fetch, reduce, chunk, rank.
//!
//! [`Pipeline::run`] executes one search end to end. [`Pipeline::run_tracked`]
//! additionally reports `processing -> completed | failed` to a [`Storage`]
//! and persists the ranked chunks before marking the search completed.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chunking::{Chunker, WordChunker};
use crate::core::{Chunk, SearchRequest, StatusUpdate};
use crate::error::Result;
use crate::fetch::{FetchBackend, FetchSource};
use crate::markup;
use crate::search::{self, RankedResult, ScoringTier};
use crate::storage::Storage;

/// Result of a successful search run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Number of ranked chunks returned.
    pub results_count: usize,
    /// Wall-clock duration of the run.
    pub processing_time_ms: u64,
    /// Chunks produced before ranking.
    pub total_chunks: usize,
    /// Tier that produced the results, if any.
    pub tier: Option<ScoringTier>,
    /// Ranked chunks, best first.
    pub chunks: Vec<Chunk>,
    /// Where the page body came from.
    pub fetch_source: FetchSource,
}

/// Output of the offline stages for one page.
#[derive(Debug, Clone, Default)]
pub struct PageAnalysis {
    /// Chunks produced before ranking.
    pub total_chunks: usize,
    /// Ranked chunks and tier.
    pub ranked: RankedResult,
}

/// Runs reduce, chunk, and rank over an already fetched page.
///
/// Never fails. Empty page text yields an empty analysis.
///
/// # Examples
///
/// ```
/// use sitesift::chunking::WordChunker;
/// use sitesift::pipeline::analyze_page;
///
/// let html = "<p>The quick brown fox</p><script>evil()</script>";
/// let analysis = analyze_page(html, &WordChunker::new(), "fox", 5, 500);
/// assert_eq!(analysis.total_chunks, 1);
/// assert_eq!(analysis.ranked.chunks[0].content, "The quick brown fox");
/// ```
#[must_use]
pub fn analyze_page(
    html: &str,
    chunker: &dyn Chunker,
    query: &str,
    max_results: usize,
    max_tokens_per_chunk: usize,
) -> PageAnalysis {
    let text = markup::reduce(html);
    let chunks = chunker.chunk(&text, max_tokens_per_chunk);
    debug!(
        text_chars = text.chars().count(),
        chunks = chunks.len(),
        strategy = chunker.name(),
        "page chunked"
    );

    let ranked = search::rank(&chunks, query, max_results);
    PageAnalysis {
        total_chunks: chunks.len(),
        ranked,
    }
}

/// The search pipeline.
///
/// Holds the fetcher explicitly so one client can be shared by every run.
/// Runs hold no shared mutable state and may execute concurrently.
pub struct Pipeline<F> {
    fetcher: F,
    chunker: Box<dyn Chunker>,
}

impl<F: FetchBackend> Pipeline<F> {
    /// Creates a pipeline using the word chunker.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            chunker: Box::new(WordChunker::new()),
        }
    }

    /// Replaces the chunking strategy.
    #[must_use]
    pub fn with_chunker(mut self, chunker: Box<dyn Chunker>) -> Self {
        self.chunker = chunker;
        self
    }

    /// Returns the fetcher.
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs one search.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` if the request fails validation and
    /// `Error::Fetch` if the page cannot be retrieved. Later stages cannot
    /// fail.
    pub async fn run(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let started = Instant::now();
        request.validate()?;

        info!(
            url = %request.website_url,
            backend = self.fetcher.name(),
            "fetching page"
        );
        let raw = self.fetcher.fetch(&request.website_url).await?;

        let analysis = analyze_page(
            &raw.body,
            self.chunker.as_ref(),
            &request.search_query,
            request.max_results,
            request.max_tokens_per_chunk,
        );

        let outcome = SearchOutcome {
            results_count: analysis.ranked.len(),
            processing_time_ms: elapsed_ms(started),
            total_chunks: analysis.total_chunks,
            tier: analysis.ranked.tier,
            chunks: analysis.ranked.chunks,
            fetch_source: raw.source,
        };
        info!(
            results = outcome.results_count,
            total_chunks = outcome.total_chunks,
            tier = ?outcome.tier,
            elapsed_ms = outcome.processing_time_ms,
            "search finished"
        );
        Ok(outcome)
    }

    /// Runs a search that already has a `pending` record in `store`.
    ///
    /// Emits `processing`, then either persists results and emits
    /// `completed`, or emits `failed` with the error text.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error after recording it, or a storage error
    /// if the store rejects a transition.
    pub async fn run_tracked<S>(
        &self,
        store: &mut S,
        search_id: i64,
        request: &SearchRequest,
    ) -> Result<SearchOutcome>
    where
        S: Storage + ?Sized,
    {
        let started = Instant::now();
        store.update_status(search_id, &StatusUpdate::processing())?;
        debug!(search_id, "status -> processing");

        let result = self
            .run(request)
            .await
            .and_then(|outcome| Self::complete(store, search_id, outcome));

        match result {
            Ok(outcome) => {
                debug!(search_id, "status -> completed");
                Ok(outcome)
            }
            Err(e) => {
                let update = StatusUpdate::failed(e.to_string(), Some(elapsed_ms(started)));
                if let Err(store_err) = store.update_status(search_id, &update) {
                    warn!(search_id, error = %store_err, "could not record failure");
                } else {
                    debug!(search_id, error = %e, "status -> failed");
                }
                Err(e)
            }
        }
    }

    /// Persists the ranked chunks, then marks the search completed.
    fn complete<S>(store: &mut S, search_id: i64, outcome: SearchOutcome) -> Result<SearchOutcome>
    where
        S: Storage + ?Sized,
    {
        store.save_results(search_id, &outcome.chunks)?;

        let mut update = StatusUpdate::completed(
            outcome.processing_time_ms,
            outcome.results_count,
            outcome.total_chunks,
        )
        .with_fetch_source(outcome.fetch_source.as_str());
        if let Some(tier) = outcome.tier {
            update = update.with_scoring_tier(tier.as_str());
        }
        store.update_status(search_id, &update)?;
        Ok(outcome)
    }

    /// Creates a `pending` record for `request` and runs it tracked.
    ///
    /// The outer `Result` covers record creation; the inner one is the
    /// search itself, already recorded in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be created.
    pub async fn submit<S>(
        &self,
        store: &mut S,
        request: &SearchRequest,
    ) -> Result<(i64, Result<SearchOutcome>)>
    where
        S: Storage + ?Sized,
    {
        let search_id = store.create_search(request)?;
        debug!(search_id, "status -> pending");
        let result = self.run_tracked(store, search_id, request).await;
        Ok((search_id, result))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SearchRecord, SearchStatus};
    use crate::error::{Error, FetchError, StorageError};
    use crate::fetch::RawContent;
    use crate::storage::{SqliteStorage, StorageStats};
    use async_trait::async_trait;

    struct StaticFetcher {
        body: std::result::Result<String, u16>,
    }

    impl StaticFetcher {
        fn html(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
            }
        }

        const fn status(status: u16) -> Self {
            Self { body: Err(status) }
        }
    }

    #[async_trait]
    impl FetchBackend for StaticFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<RawContent, FetchError> {
            match &self.body {
                Ok(body) => Ok(RawContent {
                    url: url.to_string(),
                    final_url: url.to_string(),
                    status: 200,
                    content_type: "text/html".to_string(),
                    body: body.clone(),
                    source: FetchSource::Primary,
                }),
                Err(status) => Err(FetchError::HttpStatus { status: *status }),
            }
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    fn store() -> SqliteStorage {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.init().unwrap();
        storage
    }

    const PAGE: &str = "<html><body><nav>Home About</nav>\
        <h1>Pricing</h1><p>Our plans start at ten dollars a month.</p>\
        <footer>Copyright 2024</footer></body></html>";

    #[test]
    fn test_analyze_empty_page() {
        let analysis = analyze_page("<div>  </div>", &WordChunker::new(), "fox", 5, 500);
        assert_eq!(analysis.total_chunks, 0);
        assert!(analysis.ranked.is_empty());
        assert_eq!(analysis.ranked.tier, None);
    }

    #[tokio::test]
    async fn test_run() {
        let pipeline = Pipeline::new(StaticFetcher::html(PAGE));
        let request = SearchRequest::new("https://example.com", "plans pricing");

        let outcome = pipeline.run(&request).await.unwrap();
        assert_eq!(outcome.tier, Some(ScoringTier::Strict));
        assert_eq!(outcome.results_count, outcome.chunks.len());
        assert_eq!(outcome.total_chunks, 1);
        assert_eq!(outcome.fetch_source, FetchSource::Primary);
        assert!(!outcome.chunks[0].content.contains("Home"));
        assert!(!outcome.chunks[0].content.contains("Copyright"));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_request() {
        let pipeline = Pipeline::new(StaticFetcher::html(PAGE));
        let request = SearchRequest::new("https://example.com", "   ");
        let err = pipeline.run(&request).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_run_empty_page_is_not_an_error() {
        let pipeline = Pipeline::new(StaticFetcher::html("<script>x()</script>"));
        let outcome = pipeline
            .run(&SearchRequest::new("https://example.com", "fox"))
            .await
            .unwrap();
        assert_eq!(outcome.results_count, 0);
        assert_eq!(outcome.total_chunks, 0);
    }

    #[tokio::test]
    async fn test_submit_completed() {
        let pipeline = Pipeline::new(StaticFetcher::html(PAGE));
        let mut storage = store();
        let request = SearchRequest::new("https://example.com", "plans");

        let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
        let outcome = result.unwrap();

        let record = storage.get_search(id).unwrap().unwrap();
        assert_eq!(record.status, SearchStatus::Completed);
        assert_eq!(record.results_count, Some(outcome.results_count));
        assert_eq!(record.total_chunks, Some(outcome.total_chunks));
        assert_eq!(record.scoring_tier.as_deref(), Some("strict"));
        assert_eq!(record.fetch_source.as_deref(), Some("primary"));
        assert_eq!(storage.get_results(id).unwrap(), outcome.chunks);
    }

    #[tokio::test]
    async fn test_submit_failed() {
        let pipeline = Pipeline::new(StaticFetcher::status(503));
        let mut storage = store();
        let request = SearchRequest::new("https://example.com", "plans");

        let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
        assert!(matches!(
            result,
            Err(Error::Fetch(FetchError::HttpStatus { status: 503 }))
        ));

        let record = storage.get_search(id).unwrap().unwrap();
        assert_eq!(record.status, SearchStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("fetch error: HTTP status 503"));
        assert!(record.processing_time_ms.is_some());
        assert!(storage.get_results(id).unwrap().is_empty());
    }

    /// Delegates to SQLite but refuses to mark any search completed.
    struct RejectCompletion(SqliteStorage);

    impl Storage for RejectCompletion {
        fn init(&mut self) -> Result<()> {
            self.0.init()
        }

        fn is_initialized(&self) -> Result<bool> {
            self.0.is_initialized()
        }

        fn reset(&mut self) -> Result<()> {
            self.0.reset()
        }

        fn create_search(&mut self, request: &SearchRequest) -> Result<i64> {
            self.0.create_search(request)
        }

        fn update_status(&mut self, search_id: i64, update: &StatusUpdate) -> Result<()> {
            if update.status == Some(SearchStatus::Completed) {
                return Err(StorageError::Transaction("disk full".to_string()).into());
            }
            self.0.update_status(search_id, update)
        }

        fn get_search(&self, search_id: i64) -> Result<Option<SearchRecord>> {
            self.0.get_search(search_id)
        }

        fn list_searches(&self, limit: usize) -> Result<Vec<SearchRecord>> {
            self.0.list_searches(limit)
        }

        fn delete_search(&mut self, search_id: i64) -> Result<()> {
            self.0.delete_search(search_id)
        }

        fn save_results(&mut self, search_id: i64, chunks: &[Chunk]) -> Result<()> {
            self.0.save_results(search_id, chunks)
        }

        fn get_results(&self, search_id: i64) -> Result<Vec<Chunk>> {
            self.0.get_results(search_id)
        }

        fn stats(&self) -> Result<StorageStats> {
            self.0.stats()
        }
    }

    #[tokio::test]
    async fn test_failed_completion_is_recorded() {
        let pipeline = Pipeline::new(StaticFetcher::html(PAGE));
        let mut storage = RejectCompletion(store());
        let request = SearchRequest::new("https://example.com", "plans");

        let (id, result) = pipeline.submit(&mut storage, &request).await.unwrap();
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::Transaction(_)))
        ));

        let record = storage.get_search(id).unwrap().unwrap();
        assert_eq!(record.status, SearchStatus::Failed);
        assert!(record.error_message.unwrap().contains("disk full"));
        assert!(record.processing_time_ms.is_some());
    }

    #[tokio::test]
    async fn test_run_tracked_rejects_non_pending() {
        let pipeline = Pipeline::new(StaticFetcher::html(PAGE));
        let mut storage = store();
        let request = SearchRequest::new("https://example.com", "plans");

        let (id, _) = pipeline.submit(&mut storage, &request).await.unwrap();
        let err = pipeline
            .run_tracked(&mut storage, id, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
