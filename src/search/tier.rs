//! Scoring tiers applied in sequence until one yields results.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Chunk;
use crate::search::lenient::lenient_score;
use crate::search::query::Query;
use crate::search::strict::strict_score;

/// Score assigned to chunks chosen by the longest-chunk tier.
pub const LONGEST_TIER_SCORE: f64 = 0.1;

/// The longest-chunk tier returns at most this many chunks.
pub const LONGEST_TIER_LIMIT: usize = 3;

/// A ranking tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringTier {
    /// Word-boundary weighted scoring.
    Strict,
    /// Substring and variant scoring with a letter floor.
    Lenient,
    /// Longest chunks, unscored.
    Longest,
}

/// Tiers in the order they are tried.
pub const TIERS: [ScoringTier; 3] = [
    ScoringTier::Strict,
    ScoringTier::Lenient,
    ScoringTier::Longest,
];

impl ScoringTier {
    /// Returns the tier name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
            Self::Longest => "longest",
        }
    }

    /// Selects up to `max_results` chunks under this tier.
    ///
    /// Scoring tiers keep chunks with a positive score, ordered by score
    /// descending with ties broken by chunk index. The longest tier keeps
    /// at most [`LONGEST_TIER_LIMIT`] chunks ordered by character length.
    #[must_use]
    pub fn select(self, chunks: &[Chunk], query: &Query, max_results: usize) -> Vec<Chunk> {
        match self {
            Self::Strict => select_scored(chunks, max_results, |c| strict_score(&c.content, query)),
            Self::Lenient => {
                select_scored(chunks, max_results, |c| lenient_score(&c.content, query))
            }
            Self::Longest => select_longest(chunks, max_results.min(LONGEST_TIER_LIMIT)),
        }
    }
}

impl fmt::Display for ScoringTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn select_scored<F>(chunks: &[Chunk], max_results: usize, score: F) -> Vec<Chunk>
where
    F: Fn(&Chunk) -> f64,
{
    let mut scored: Vec<(f64, &Chunk)> = chunks
        .iter()
        .map(|chunk| (score(chunk), chunk))
        .filter(|(s, _)| *s > 0.0)
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.chunk_index.cmp(&b.chunk_index))
    });

    scored
        .into_iter()
        .take(max_results)
        .map(|(s, chunk)| chunk.clone().with_score(s))
        .collect()
}

fn select_longest(chunks: &[Chunk], limit: usize) -> Vec<Chunk> {
    let mut by_length: Vec<&Chunk> = chunks.iter().collect();
    by_length.sort_by(|a, b| {
        b.char_len()
            .cmp(&a.char_len())
            .then_with(|| a.chunk_index.cmp(&b.chunk_index))
    });

    by_length
        .into_iter()
        .take(limit)
        .map(|chunk| chunk.clone().with_score(LONGEST_TIER_SCORE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new((*t).to_string(), i + 1, 500))
            .collect()
    }

    #[test]
    fn test_tier_order() {
        assert_eq!(
            TIERS,
            [ScoringTier::Strict, ScoringTier::Lenient, ScoringTier::Longest]
        );
    }

    #[test]
    fn test_strict_filters_zero_scores() {
        let input = chunks(&["the fox runs", "nothing here", "a fox again"]);
        let selected = ScoringTier::Strict.select(&input, &Query::parse("fox"), 10);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|c| c.relevance_score > 0.0));
    }

    #[test]
    fn test_ties_broken_by_index() {
        let input = chunks(&["fox one", "fox two", "fox six"]);
        let selected = ScoringTier::Strict.select(&input, &Query::parse("fox"), 10);
        let order: Vec<usize> = selected.iter().map(|c| c.chunk_index).collect();
        assert_eq!(order, [1, 2, 3]);
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let input = chunks(&["a firefox mention", "fox"]);
        let selected = ScoringTier::Strict.select(&input, &Query::parse("fox"), 10);
        assert_eq!(selected[0].chunk_index, 2);
        assert!(selected[0].relevance_score >= selected[1].relevance_score);
    }

    #[test]
    fn test_truncated_to_max_results() {
        let input = chunks(&["fox", "fox", "fox", "fox"]);
        let selected = ScoringTier::Strict.select(&input, &Query::parse("fox"), 2);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_lenient_applies_floor() {
        let input = chunks(&["plain words", "123"]);
        let selected = ScoringTier::Lenient.select(&input, &Query::parse("zebra"), 10);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].chunk_index, 1);
    }

    #[test]
    fn test_longest_caps_at_three() {
        let input = chunks(&["aa", "aaaa", "a", "aaa", "aaaaa"]);
        let selected = ScoringTier::Longest.select(&input, &Query::default(), 10);
        let order: Vec<usize> = selected.iter().map(|c| c.chunk_index).collect();
        assert_eq!(order, [5, 2, 4]);
        assert!(selected.iter().all(|c| (c.relevance_score - LONGEST_TIER_SCORE).abs() < f64::EPSILON));
    }

    #[test]
    fn test_longest_respects_smaller_max() {
        let input = chunks(&["aa", "aaaa", "a"]);
        let selected = ScoringTier::Longest.select(&input, &Query::default(), 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].chunk_index, 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(ScoringTier::Lenient.to_string(), "lenient");
    }
}
