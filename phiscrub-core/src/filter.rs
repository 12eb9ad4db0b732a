//! filter.rs - Post-scan match filtering.
//!
//! The scanner pre-filters by confidence while selecting patterns, but this
//! module is the single authoritative filter point: callers holding matches
//! from any source narrow them here by confidence threshold and category
//! allow-list before reporting or redaction.

use std::collections::HashSet;

use crate::config::PhiCategory;
use crate::scan_match::PhiMatch;

/// Returns the subset of `matches` with `confidence >= min_confidence` and,
/// if `allowed_categories` is given, a category in the allow-list.
///
/// The filter is stable: surviving matches keep their relative order, so a
/// canonically sorted input stays canonically sorted. Raising the threshold
/// never increases the number of returned matches.
pub fn filter_matches(
    mut matches: Vec<PhiMatch>,
    min_confidence: f64,
    allowed_categories: Option<&HashSet<PhiCategory>>,
) -> Vec<PhiMatch> {
    matches.retain(|m| {
        m.confidence >= min_confidence
            && allowed_categories.map_or(true, |set| set.contains(&m.category))
    });
    matches
}
