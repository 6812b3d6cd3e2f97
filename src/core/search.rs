//! Search lifecycle records.
//!
//! A search moves through `pending -> processing -> {completed, failed}`.
//! These types describe that lifecycle for the status-tracking store; they
//! hold no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a tracked search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// Created, not yet started.
    Pending,
    /// Pipeline is running.
    Processing,
    /// Pipeline finished and results were stored.
    Completed,
    /// Pipeline aborted; see the error message.
    Failed,
}

impl SearchStatus {
    /// Returns the lowercase label used in storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// A pending search may also fail directly (e.g. a request rejected
    /// before processing starts).
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Failed)
                | (Self::Processing, Self::Completed | Self::Failed)
        )
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown search status: {other}")),
        }
    }
}

/// A status transition with its optional payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    /// Target status.
    pub status: Option<SearchStatus>,
    /// Wall-clock time the pipeline took.
    pub processing_time_ms: Option<u64>,
    /// Number of ranked chunks returned.
    pub results_count: Option<usize>,
    /// Number of chunks produced before ranking.
    pub total_chunks: Option<usize>,
    /// Failure description.
    pub error_message: Option<String>,
    /// Scoring tier that produced the results.
    pub scoring_tier: Option<String>,
    /// Whether the page body came from the page or the reader service.
    pub fetch_source: Option<String>,
}

impl StatusUpdate {
    /// Transition to `processing`.
    #[must_use]
    pub fn processing() -> Self {
        Self {
            status: Some(SearchStatus::Processing),
            ..Self::default()
        }
    }

    /// Transition to `completed` with run statistics.
    #[must_use]
    pub fn completed(processing_time_ms: u64, results_count: usize, total_chunks: usize) -> Self {
        Self {
            status: Some(SearchStatus::Completed),
            processing_time_ms: Some(processing_time_ms),
            results_count: Some(results_count),
            total_chunks: Some(total_chunks),
            ..Self::default()
        }
    }

    /// Records the scoring tier label.
    #[must_use]
    pub fn with_scoring_tier(mut self, tier: impl Into<String>) -> Self {
        self.scoring_tier = Some(tier.into());
        self
    }

    /// Records the fetch source label.
    #[must_use]
    pub fn with_fetch_source(mut self, source: impl Into<String>) -> Self {
        self.fetch_source = Some(source.into());
        self
    }

    /// Transition to `failed` with an error message.
    #[must_use]
    pub fn failed(error_message: impl Into<String>, processing_time_ms: Option<u64>) -> Self {
        Self {
            status: Some(SearchStatus::Failed),
            processing_time_ms,
            error_message: Some(error_message.into()),
            ..Self::default()
        }
    }
}

/// A tracked search as stored by the status store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Search identifier (assigned by storage).
    pub id: i64,
    /// Page that was searched.
    pub website_url: String,
    /// Query text.
    pub search_query: String,
    /// Requested result limit.
    pub max_results: usize,
    /// Requested chunk token budget.
    pub max_tokens_per_chunk: usize,
    /// Current lifecycle state.
    pub status: SearchStatus,
    /// Pipeline duration, once known.
    pub processing_time_ms: Option<u64>,
    /// Number of stored results, once completed.
    pub results_count: Option<usize>,
    /// Chunks produced before ranking, once completed.
    pub total_chunks: Option<usize>,
    /// Failure description, if failed.
    pub error_message: Option<String>,
    /// Scoring tier label, once completed.
    pub scoring_tier: Option<String>,
    /// Fetch source label, once completed.
    pub fetch_source: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of the last transition.
    pub updated_at: i64,
}
