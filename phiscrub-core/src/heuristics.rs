//! heuristics.rs - Supplementary person-name detection.
//!
//! Generic regex cannot reliably detect person names, so the scanner
//! supplements the NAME category with a capitalization heuristic backed by
//! common first/last-name lookup tables. A two-token title-case candidate is
//! accepted when its first token is a common first name OR its last token is
//! a common last name; the inclusive OR catches names where only one part is
//! common, at the cost of some false positives on capitalized phrases.
//!
//! Known non-detections: hyphenated names, names of more or fewer than two
//! tokens, and non-Latin scripts.
//!
//! License: MIT OR Apache-2.0

use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::config::PhiCategory;
use crate::scan_match::{log_match_debug, PhiMatch};

/// Fixed confidence for heuristic name matches; deliberately lower than the
/// deterministic regex patterns.
pub const NAME_HEURISTIC_CONFIDENCE: f64 = 0.6;

const NAME_HEURISTIC_ID: &str = "name_heuristic";

lazy_static! {
    /// Two capitalized words separated by a single space.
    static ref NAME_CANDIDATE: Regex = Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").unwrap();
}

static COMMON_FIRST_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "james", "mary", "robert", "patricia", "john", "jennifer", "michael", "linda",
        "william", "elizabeth", "david", "barbara", "richard", "susan", "joseph", "jessica",
        "thomas", "sarah", "charles", "karen", "christopher", "nancy", "daniel", "lisa",
        "matthew", "betty", "anthony", "margaret", "mark", "sandra", "donald", "ashley",
        "steven", "kimberly", "paul", "emily", "andrew", "donna", "joshua", "michelle",
        "kenneth", "carol", "kevin", "amanda", "brian", "melissa", "george", "deborah",
        "timothy", "stephanie", "ronald", "rebecca", "jason", "laura", "edward", "helen",
    ])
});

static COMMON_LAST_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "smith", "johnson", "williams", "brown", "jones", "garcia", "miller", "davis",
        "rodriguez", "martinez", "hernandez", "lopez", "gonzalez", "wilson", "anderson",
        "thomas", "taylor", "moore", "jackson", "martin", "lee", "perez", "thompson",
        "white", "harris", "sanchez", "clark", "ramirez", "lewis", "robinson", "walker",
        "young", "allen", "king", "wright", "scott", "torres", "nguyen", "hill", "flores",
        "green", "adams", "nelson", "baker", "hall", "rivera", "campbell", "mitchell",
        "carter", "roberts",
    ])
});

/// Heuristic detector for probable person names.
#[derive(Debug, Clone)]
pub struct NameHeuristic {
    replacement: String,
}

impl NameHeuristic {
    pub fn new() -> Self {
        Self {
            replacement: "[REDACTED-NAME]".to_string(),
        }
    }

    /// Uses the catalog's configured NAME redaction token instead of the default.
    pub fn with_replacement(replacement: String) -> Self {
        Self { replacement }
    }

    /// Scans `text` for probable person names.
    pub fn detect(&self, text: &str) -> Vec<PhiMatch> {
        let mut matches = Vec::new();

        for candidate in NAME_CANDIDATE.find_iter(text) {
            // The candidate regex guarantees exactly two tokens.
            let mut tokens = candidate.as_str().split(' ');
            let (Some(first), Some(last)) = (tokens.next(), tokens.next()) else {
                continue;
            };

            let first_known = COMMON_FIRST_NAMES.contains(first.to_lowercase().as_str());
            let last_known = COMMON_LAST_NAMES.contains(last.to_lowercase().as_str());
            if !(first_known || last_known) {
                continue;
            }

            log_match_debug(module_path!(), NAME_HEURISTIC_ID, candidate.as_str());
            matches.push(PhiMatch {
                category: PhiCategory::Name,
                pattern_name: NAME_HEURISTIC_ID.to_string(),
                matched_text: candidate.as_str().to_string(),
                start: candidate.start(),
                end: candidate.end(),
                confidence: NAME_HEURISTIC_CONFIDENCE,
                replacement: self.replacement.clone(),
            });
        }

        matches
    }
}

impl Default for NameHeuristic {
    fn default() -> Self {
        Self::new()
    }
}
