// phiscrub-core/src/redaction.rs
//! Rewrites scanned text by replacing matched spans with their redaction
//! tokens.
//!
//! Overlap resolution policy: matches are applied in canonical order (start
//! ascending, ties broken by longer match first). The first match in that
//! order wins its span; any later match overlapping an already-redacted span
//! is skipped entirely, never partially rewritten. The same input always
//! produces the same output.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use std::cmp::Reverse;

use crate::errors::PhiScrubError;
use crate::scan_match::{log_redaction_debug, PhiMatch};

/// Sorts matches into canonical order: start ascending, longer match first on
/// ties. The sort is stable, so equal spans keep their relative order.
pub(crate) fn sort_canonical(matches: &mut [PhiMatch]) {
    matches.sort_by_key(|m| (m.start, Reverse(m.end)));
}

/// Produces a sanitized copy of `text` with every surviving match's span
/// replaced by its redaction token.
///
/// Spans are validated up front: each must satisfy
/// `start < end <= text.len()` and fall on character boundaries, otherwise
/// [`PhiScrubError::InvalidMatchSpan`] is returned and `text` is left
/// untouched. Matches may arrive in any order; the engine re-sorts them
/// canonically before applying the overlap policy.
pub fn redact(text: &str, matches: &[PhiMatch]) -> Result<String, PhiScrubError> {
    validate_spans(text, matches)?;
    Ok(apply(text, matches))
}

fn validate_spans(text: &str, matches: &[PhiMatch]) -> Result<(), PhiScrubError> {
    for m in matches {
        let in_bounds = m.start < m.end && m.end <= text.len();
        if !in_bounds || !text.is_char_boundary(m.start) || !text.is_char_boundary(m.end) {
            return Err(PhiScrubError::InvalidMatchSpan {
                start: m.start,
                end: m.end,
                len: text.len(),
            });
        }
    }
    Ok(())
}

/// Single-pass splice over validated spans. Callers must guarantee spans are
/// in bounds; the scanner's own matches are by construction.
pub(crate) fn apply(text: &str, matches: &[PhiMatch]) -> String {
    let mut ordered: Vec<&PhiMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| (m.start, Reverse(m.end)));

    let mut sanitized = String::with_capacity(text.len());
    let mut last_end = 0usize;

    for m in ordered {
        if m.start < last_end {
            debug!(
                "{} Skipping match '{}' at {}..{}: overlaps an already-redacted span.",
                module_path!(),
                m.pattern_name,
                m.start,
                m.end
            );
            continue;
        }
        sanitized.push_str(&text[last_end..m.start]);
        log_redaction_debug(module_path!(), &m.matched_text, &m.replacement);
        sanitized.push_str(&m.replacement);
        last_end = m.end;
    }
    sanitized.push_str(&text[last_end..]);
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhiCategory;

    fn phi_match(start: usize, end: usize, text: &str, replacement: &str) -> PhiMatch {
        PhiMatch {
            category: PhiCategory::Ssn,
            pattern_name: "test".to_string(),
            matched_text: text.to_string(),
            start,
            end,
            confidence: 0.9,
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn replaces_single_span() {
        let text = "SSN: 123-45-6789";
        let m = phi_match(5, 16, "123-45-6789", "[REDACTED-SSN]");
        assert_eq!(redact(text, &[m]).unwrap(), "SSN: [REDACTED-SSN]");
    }

    #[test]
    fn no_matches_returns_text_unchanged() {
        assert_eq!(redact("hello", &[]).unwrap(), "hello");
    }

    #[test]
    fn overlapping_match_is_skipped_entirely() {
        //        0123456789
        let text = "abcdefghij";
        let winner = phi_match(2, 8, "cdefgh", "[W]");
        let loser = phi_match(4, 10, "efghij", "[L]");
        let out = redact(text, &[winner, loser]).unwrap();
        assert_eq!(out, "ab[W]ij");
        assert!(!out.contains("[L]"));
    }

    #[test]
    fn tie_on_start_prefers_longer_match() {
        let text = "abcdefghij";
        let short = phi_match(2, 5, "cde", "[S]");
        let long = phi_match(2, 9, "cdefghi", "[L]");
        // Input order must not matter.
        assert_eq!(redact(text, &[short.clone(), long.clone()]).unwrap(), "ab[L]j");
        assert_eq!(redact(text, &[long, short]).unwrap(), "ab[L]j");
    }

    #[test]
    fn adjacent_spans_both_apply() {
        let text = "abcdef";
        let left = phi_match(0, 3, "abc", "[1]");
        let right = phi_match(3, 6, "def", "[2]");
        assert_eq!(redact(text, &[left, right]).unwrap(), "[1][2]");
    }

    #[test]
    fn out_of_range_span_is_an_error() {
        let m = phi_match(2, 99, "x", "[X]");
        let err = redact("short", &[m]).unwrap_err();
        assert!(matches!(err, PhiScrubError::InvalidMatchSpan { end: 99, .. }));
    }

    #[test]
    fn inverted_span_is_an_error() {
        let m = phi_match(4, 4, "", "[X]");
        assert!(redact("abcdef", &[m]).is_err());
    }

    #[test]
    fn non_char_boundary_span_is_an_error() {
        let text = "caf\u{e9} time"; // 'é' is two bytes
        let m = phi_match(3, 4, "?", "[X]");
        assert!(redact(text, &[m]).is_err());
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let text = "abcdefghij";
        let a = phi_match(1, 6, "bcdef", "[A]");
        let b = phi_match(3, 9, "defghi", "[B]");
        let first = redact(text, &[a.clone(), b.clone()]).unwrap();
        for _ in 0..5 {
            assert_eq!(redact(text, &[a.clone(), b.clone()]).unwrap(), first);
        }
    }
}
