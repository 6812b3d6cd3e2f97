//! Lenient (fallback) relevance scorer.
//!
//! Used only when no chunk scores above zero under the strict scorer.

use crate::search::query::Query;

/// Credit for a word found as a substring.
pub const SUBSTRING_WEIGHT: f64 = 1.0;

/// Credit for a morphological variant found as a substring.
pub const VARIANT_WEIGHT: f64 = 0.3;

/// Minimum score of any chunk that contains a lower-case letter.
pub const LETTER_FLOOR: f64 = 0.1;

/// Variants longer than this many characters are considered.
const MIN_VARIANT_CHARS: usize = 2;

/// Scores `content` against `query` by substring and variant matching.
///
/// Any chunk containing a lower-case letter gets at least
/// [`LETTER_FLOOR`]. An empty query scores `0.0`.
///
/// # Examples
///
/// ```
/// use sitesift::search::{Query, lenient_score};
///
/// // "jumps" is not in the text but "jump" is
/// let score = lenient_score("the fox jumped", &Query::parse("jumps"));
/// assert!((score - 0.3).abs() < 1e-9);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn lenient_score(content: &str, query: &Query) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let lower = content.to_lowercase();

    let raw: f64 = query
        .words()
        .map(|word| {
            if lower.contains(word) {
                SUBSTRING_WEIGHT
            } else if variants(word).any(|v| lower.contains(v.as_str())) {
                VARIANT_WEIGHT
            } else {
                0.0
            }
        })
        .sum();

    let floor = if lower.chars().any(char::is_lowercase) {
        LETTER_FLOOR
    } else {
        0.0
    };

    (raw / query.len() as f64).max(floor)
}

/// Morphological variants in checking order: `+s`, `+ing`, `+ed`, then
/// the word with its last one and two characters dropped. Variants of two
/// characters or fewer are skipped.
pub fn variants(word: &str) -> impl Iterator<Item = String> + '_ {
    let chars: Vec<char> = word.chars().collect();
    let drop_one: String = chars.iter().take(chars.len().saturating_sub(1)).collect();
    let drop_two: String = chars.iter().take(chars.len().saturating_sub(2)).collect();

    [
        format!("{word}s"),
        format!("{word}ing"),
        format!("{word}ed"),
        drop_one,
        drop_two,
    ]
    .into_iter()
    .filter(|v| v.chars().count() > MIN_VARIANT_CHARS)
}
