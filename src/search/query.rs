//! Query preparation.

use regex::Regex;

/// Query words must be longer than this many characters.
pub const MIN_WORD_CHARS: usize = 2;

/// A single query word with its precompiled word-boundary matcher.
#[derive(Debug, Clone)]
pub struct QueryTerm {
    /// Lower-cased word.
    pub word: String,
    boundary: Option<Regex>,
}

impl QueryTerm {
    fn new(word: String) -> Self {
        let boundary = Regex::new(&format!(r"\b{}\b", regex::escape(&word))).ok();
        Self { word, boundary }
    }

    /// Counts whole-word occurrences in already lower-cased text.
    #[must_use]
    pub fn exact_matches(&self, haystack: &str) -> usize {
        self.boundary
            .as_ref()
            .map_or(0, |re| re.find_iter(haystack).count())
    }

    /// Counts substring occurrences (non-overlapping) in lower-cased text.
    #[must_use]
    pub fn substring_matches(&self, haystack: &str) -> usize {
        haystack.matches(self.word.as_str()).count()
    }
}

/// A prepared query: lower-cased whitespace-separated words, dropping
/// words of two characters or fewer.
///
/// # Examples
///
/// ```
/// use sitesift::search::Query;
///
/// let query = Query::parse("How do I Reset my password?");
/// let words: Vec<&str> = query.words().collect();
/// assert_eq!(words, ["how", "reset", "password?"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    terms: Vec<QueryTerm>,
}

impl Query {
    /// Prepares a raw query string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let terms = raw
            .to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() > MIN_WORD_CHARS)
            .map(|word| QueryTerm::new(word.to_string()))
            .collect();
        Self { terms }
    }

    /// Returns the prepared terms.
    #[must_use]
    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    /// Iterates over the prepared words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.word.as_str())
    }

    /// Number of prepared words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when every word was filtered out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
