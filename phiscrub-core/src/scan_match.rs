// phiscrub-core/src/scan_match.rs
//! Provides core data structures and utility functions for PHI matches and
//! scan results, plus PHI-safe debug logging within the `phiscrub-core`
//! library.

use hex;
use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::PhiCategory;

lazy_static! {
    /// A static boolean that is initialized once to determine if PHI is allowed in debug logs.
    static ref PHI_DEBUG_ALLOWED: bool = {
        std::env::var("PHISCRUB_ALLOW_DEBUG_PHI")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A single occurrence of PHI found in a specific text.
///
/// Spans are half-open UTF-8 byte offsets into the scanned text, so
/// `&text[start..end] == matched_text` always holds for matches produced by
/// the scanner. Matches are transient: they are owned by the scan result
/// that produced them and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiMatch {
    /// The category of PHI detected.
    pub category: PhiCategory,
    /// Name of the pattern (or heuristic) that produced the match.
    pub pattern_name: String,
    /// The matched substring.
    pub matched_text: String,
    /// Start of the span (inclusive).
    pub start: usize,
    /// End of the span (exclusive); always greater than `start`.
    pub end: usize,
    /// Confidence copied from the originating pattern.
    pub confidence: f64,
    /// Pre-rendered redaction token for this category.
    pub replacement: String,
}

impl PhiMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Aggregate of a single scan. Immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// True iff at least one match survived filtering.
    pub detected: bool,
    /// Matches sorted by start ascending, ties broken by longer match first.
    pub matches: Vec<PhiMatch>,
    /// Maximum confidence across `matches`, or 0.0 if empty.
    pub highest_confidence: f64,
    /// Sanitized text; populated only when redaction was requested.
    pub redacted_text: Option<String>,
}

impl ScanResult {
    /// Builds a result from an already-filtered, canonically sorted match set.
    pub fn new(matches: Vec<PhiMatch>, redacted_text: Option<String>) -> Self {
        let highest_confidence = matches.iter().map(|m| m.confidence).fold(0.0, f64::max);
        Self {
            detected: !matches.is_empty(),
            highest_confidence,
            matches,
            redacted_text,
        }
    }
}

/// Produces a log-safe placeholder for a sensitive string.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PHI_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_match_debug(module_path: &str, pattern_name: &str, original_sensitive_content: &str) {
    debug!(
        "{} Found PhiMatch: Pattern='{}', Original='{}'",
        module_path,
        pattern_name,
        get_loggable_content(original_sensitive_content)
    );
}

pub fn log_redaction_debug(
    module_path: &str,
    original_sensitive_content: &str,
    sanitized_replacement: &str,
) {
    debug!(
        "{} Redaction action: Original='{}', Redacted='{}'",
        module_path,
        get_loggable_content(original_sensitive_content),
        sanitized_replacement
    );
}

/// Canonical hash of a matched snippet, keyed by the pattern that found it.
/// Whitespace and case are normalized so audit records for the same value
/// collide regardless of formatting.
pub fn canonical_sample_hash(pattern_name: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(pattern_name.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
