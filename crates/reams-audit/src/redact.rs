// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS PII Redaction
// ─────────────────────────────────────────────────────────────────────
//! Replaces e-mail addresses, SSN-shaped digit groups and long digit
//! runs with fixed placeholders before step text is logged or sealed.
//!
//! Rules run in order (e-mail, SSN, long number), each on the output of
//! the previous one.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const EMAIL_PLACEHOLDER: &str = "[redacted-email]";
pub const SSN_PLACEHOLDER: &str = "[redacted-ssn]";
pub const NUMBER_PLACEHOLDER: &str = "[redacted-num]";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w.-]+@[\w.-]+\.\w+\b").expect("valid email regex"));
static SSN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("valid ssn regex"));
static LONG_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{9,}\b").expect("valid long number regex"));

/// How many spans each rule replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSummary {
    pub emails: usize,
    pub ssns: usize,
    pub long_numbers: usize,
}

impl RedactionSummary {
    pub fn total(&self) -> usize {
        self.emails + self.ssns + self.long_numbers
    }
}

/// Redact and report what was replaced.
pub fn redact_with_summary(text: &str) -> (String, RedactionSummary) {
    let mut summary = RedactionSummary::default();

    summary.emails = EMAIL_RE.find_iter(text).count();
    let out = EMAIL_RE.replace_all(text, EMAIL_PLACEHOLDER);

    summary.ssns = SSN_RE.find_iter(&out).count();
    let out = SSN_RE.replace_all(&out, SSN_PLACEHOLDER).into_owned();

    summary.long_numbers = LONG_NUMBER_RE.find_iter(&out).count();
    let out = LONG_NUMBER_RE.replace_all(&out, NUMBER_PLACEHOLDER).into_owned();

    if summary.total() > 0 {
        log::debug!(
            "redacted {} email(s), {} ssn(s), {} long number(s)",
            summary.emails,
            summary.ssns,
            summary.long_numbers
        );
    }
    (out, summary)
}

/// Text with PII replaced by placeholders.
pub fn redact_text(text: &str) -> String {
    redact_with_summary(text).0
}
