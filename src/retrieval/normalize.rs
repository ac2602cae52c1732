//! Query and chunk text normalization.
//!
//! One tokenizer is shared by corpus loading and query parsing so chunk
//! tokens and query terms match by construction: Unicode case-fold, split on
//! non-alphanumeric boundaries, drop terms shorter than two characters, drop
//! a fixed stop-term set. Order is preserved and duplicates are kept.

/// Minimum term length in characters. Shorter runs are separators in
/// practice (initials, list markers) and never carry clinical meaning.
const MIN_TERM_CHARS: usize = 2;

/// English function words excluded from matching. The corpus is
/// English-language obstetric literature, so no other language set applies.
/// Must stay sorted — `is_stop_term` binary-searches it.
const STOP_TERMS: &[&str] = &[
    "about", "after", "all", "also", "an", "and", "any", "are", "as", "at",
    "be", "been", "before", "being", "between", "both", "but", "by", "can",
    "could", "did", "do", "does", "during", "each", "for", "from", "had",
    "has", "have", "how", "if", "in", "into", "is", "it", "its", "may",
    "more", "most", "no", "not", "of", "on", "or", "other", "our", "out",
    "over", "per", "should", "so", "some", "such", "than", "that", "the",
    "their", "then", "there", "these", "they", "this", "those", "through",
    "to", "under", "up", "was", "were", "what", "when", "where", "which",
    "while", "who", "will", "with", "within", "would",
];

fn is_stop_term(term: &str) -> bool {
    STOP_TERMS.binary_search(&term).is_ok()
}

/// Split text into normalized terms.
///
/// Letter/digit runs are terms, everything else is a separator. Duplicates
/// are kept in encounter order — term frequency matters to the scorer.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= MIN_TERM_CHARS)
        .filter(|term| !is_stop_term(term))
        .map(str::to_string)
        .collect()
}

/// A raw query reduced to its normalized terms. Ephemeral, one per request.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    raw_text: String,
    terms: Vec<String>,
}

impl NormalizedQuery {
    /// Parse a raw query. Never fails; an input that trims to empty (or
    /// contains only separators and stop terms) yields an empty term list.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let terms = if trimmed.is_empty() {
            Vec::new()
        } else {
            tokenize(trimmed)
        };
        Self {
            raw_text: raw.to_string(),
            terms,
        }
    }

    /// Original input, retained for diagnostics only.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
