//! Relevance ranking for page chunks.
//!
//! Chunks are scored by a strict word-boundary scorer first. If nothing
//! scores above zero, a lenient substring scorer is tried, and as a last
//! resort the longest chunks are returned so a non-empty page never yields
//! an empty result.

mod lenient;
mod query;
mod strict;
mod tier;

pub use lenient::{LETTER_FLOOR, lenient_score, variants};
pub use query::{Query, QueryTerm};
pub use strict::strict_score;
pub use tier::{LONGEST_TIER_LIMIT, LONGEST_TIER_SCORE, ScoringTier, TIERS};

use serde::Serialize;
use tracing::debug;

use crate::core::Chunk;

/// Ranked chunks plus the tier that produced them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedResult {
    /// Selected chunks, best first.
    pub chunks: Vec<Chunk>,
    /// Tier that produced the chunks; `None` when there was nothing to rank.
    pub tier: Option<ScoringTier>,
}

impl RankedResult {
    /// Number of ranked chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when no chunks were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Ranks `chunks` against `query_text`, returning at most `max_results`.
///
/// # Examples
///
/// ```
/// use sitesift::chunking::{Chunker, WordChunker};
/// use sitesift::search::{ScoringTier, rank};
///
/// let chunks = WordChunker::new().chunk("the quick brown fox", 500);
/// let ranked = rank(&chunks, "fox jump", 5);
/// assert_eq!(ranked.tier, Some(ScoringTier::Strict));
/// assert!(ranked.chunks[0].relevance_score > 0.0);
/// ```
#[must_use]
pub fn rank(chunks: &[Chunk], query_text: &str, max_results: usize) -> RankedResult {
    if chunks.is_empty() || max_results == 0 {
        return RankedResult::default();
    }

    let query = Query::parse(query_text);
    debug!(words = query.len(), chunks = chunks.len(), "ranking chunks");

    for tier in TIERS {
        let selected = tier.select(chunks, &query, max_results);
        if !selected.is_empty() {
            debug!(%tier, selected = selected.len(), "tier produced results");
            return RankedResult {
                chunks: selected,
                tier: Some(tier),
            };
        }
        debug!(%tier, "tier produced no results");
    }

    RankedResult::default()
}
