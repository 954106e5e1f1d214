// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Lexical Feature Extractor
// ─────────────────────────────────────────────────────────────────────
//! Tokenization, term frequencies, keyword hits and pattern counts.
//!
//! Everything here is pure. Keyword hits count each keyword once per
//! presence as a substring of the lowercased text, so multi-word
//! phrases ("private data") and bare punctuation ("[") work the same
//! way as single words.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Unsafe or policy-violating vocabulary, penalised by compliance.
pub const BANNED_TERMS: &[&str] = &[
    "exploit",
    "bypass",
    "harm",
    "malware",
    "weapon",
    "illegal",
    "jailbreak",
    "private data",
    "ssn",
];

/// Absolute-certainty vocabulary, penalised by calibration.
pub const CERTAINTY_TERMS: &[&str] = &[
    "always",
    "never",
    "guarantee",
    "prove",
    "impossible",
    "certain",
    "must",
    "undeniably",
];

/// Markers of cited or sourced reasoning.
pub const EVIDENCE_TERMS: &[&str] = &[
    "because",
    "according",
    "study",
    "paper",
    "data",
    "source",
    "citation",
    "ref",
    "evidence",
    "figure",
    "table",
    "appendix",
    "[",
    "]",
];

/// Subset of banned terms that counts as a malicious leak when admitted.
pub const MALICIOUS_TERMS: &[&str] = &["exploit", "jailbreak", "ssn"];

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]").expect("valid citation regex"));
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]+""#).expect("valid quote regex"));
static PROPER_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+)?\b").expect("valid proper noun regex")
});

/// Lowercase, then split into maximal runs of ASCII letters and digits.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Sparse term-frequency vector with a cached squared norm.
///
/// `absorb` folds more text in without rescanning what is already
/// counted, which keeps accumulated-history cosine cost proportional to
/// the text being compared rather than the history length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequencies {
    counts: HashMap<String, u64>,
    total: u64,
    norm_sq: u64,
}

impl TermFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut tf = Self::new();
        tf.absorb(text);
        tf
    }

    /// Add every token of `text` to the vector.
    pub fn absorb(&mut self, text: &str) {
        for token in tokenize(text) {
            let count = self.counts.entry(token).or_insert(0);
            // (c + 1)^2 - c^2
            self.norm_sq = self
                .norm_sq
                .saturating_add(count.saturating_mul(2).saturating_add(1));
            *count = count.saturating_add(1);
            self.total = self.total.saturating_add(1);
        }
    }

    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Total token occurrences.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct tokens.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn norm(&self) -> f64 {
        (self.norm_sq as f64).sqrt()
    }

    /// Cosine similarity; 0 when either side has no tokens.
    pub fn cosine(&self, other: &TermFrequencies) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        let dot = small
            .counts
            .iter()
            .map(|(token, &c)| c.saturating_mul(large.get(token)))
            .fold(0u64, u64::saturating_add);
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (dot as f64 / denom).clamp(0.0, 1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// Token → occurrence count over `tokenize(text)`.
pub fn term_frequencies(text: &str) -> HashMap<String, u64> {
    TermFrequencies::from_text(text).counts
}

/// Number of `keywords` present at least once in the lowercased text.
pub fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    let lower = text.to_lowercase();
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keyword_hits(text, keywords) > 0
}

/// Decimal numbers such as `16` or `3.14`.
pub fn number_count(text: &str) -> usize {
    NUMBER_RE.find_iter(text).count()
}

/// Bracketed citations such as `[1]` or `[Smith 2020]`.
pub fn citation_count(text: &str) -> usize {
    CITATION_RE.find_iter(text).count()
}

/// Non-empty double-quoted spans.
pub fn quote_span_count(text: &str) -> usize {
    QUOTE_RE.find_iter(text).count()
}

/// Capitalised words, a two-word capitalised run counting once.
pub fn proper_noun_count(text: &str) -> usize {
    PROPER_NOUN_RE.find_iter(text).count()
}

/// All primitive statistics of one text in a single pass per feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexicalFeatures {
    pub token_count: usize,
    pub distinct_tokens: usize,
    pub evidence_hits: usize,
    pub numbers: usize,
    pub citations: usize,
    pub quotes: usize,
    pub proper_nouns: usize,
}

impl LexicalFeatures {
    pub fn extract(text: &str) -> Self {
        let tf = TermFrequencies::from_text(text);
        Self {
            token_count: tf.total() as usize,
            distinct_tokens: tf.distinct(),
            evidence_hits: keyword_hits(text, EVIDENCE_TERMS),
            numbers: number_count(text),
            citations: citation_count(text),
            quotes: quote_span_count(text),
            proper_nouns: proper_noun_count(text),
        }
    }
}
