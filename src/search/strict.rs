//! Strict (primary) relevance scorer.
//!
//! Per query word: `2` per whole-word match, `0.5` per substring-only
//! match, and `1` if the word shows up in the first 200 characters. The
//! sum is divided by `ln(len + 1) * words` and clamped to `[0, 1]`.

use crate::search::query::Query;

/// Weight of a whole-word match.
pub const EXACT_WEIGHT: f64 = 2.0;

/// Weight of a substring match that is not a whole word.
pub const PARTIAL_WEIGHT: f64 = 0.5;

/// Bonus when the word appears near the start of the chunk.
pub const LEADING_BONUS: f64 = 1.0;

/// Size of the "near the start" window in characters.
pub const LEADING_WINDOW_CHARS: usize = 200;

/// Scores `content` against `query`.
///
/// Returns `0.0` for an empty query or empty content.
///
/// # Examples
///
/// ```
/// use sitesift::search::{Query, strict_score};
///
/// let score = strict_score("the quick brown fox", &Query::parse("fox jump"));
/// assert!(score > 0.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn strict_score(content: &str, query: &Query) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let lower = content.to_lowercase();
    let leading = leading_chars(&lower, LEADING_WINDOW_CHARS);

    let raw: f64 = query
        .terms()
        .iter()
        .map(|term| {
            let exact = term.exact_matches(&lower);
            let partial_only = term.substring_matches(&lower).saturating_sub(exact);
            let mut score = EXACT_WEIGHT * exact as f64 + PARTIAL_WEIGHT * partial_only as f64;
            if leading.contains(term.word.as_str()) {
                score += LEADING_BONUS;
            }
            score
        })
        .sum();

    let length = content.chars().count() as f64;
    let norm = (length + 1.0).ln() * query.len() as f64;
    if norm <= 0.0 {
        return 0.0;
    }

    (raw / norm).clamp(0.0, 1.0)
}

/// Returns the prefix of `s` holding at most `n` characters.
fn leading_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(end, _)| &s[..end])
}
