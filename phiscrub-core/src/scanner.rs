// phiscrub-core/src/scanner.rs
//! The PHI scanner: applies the compiled pattern catalog and the name
//! heuristic to input text and returns a filtered, canonically sorted
//! [`ScanResult`].
//!
//! Scanning never fails: any string is valid input, and the only fallible
//! step (catalog compilation) happens before a scanner exists. The scanner
//! supports a sequential mode and a parallel mode that fans each requested
//! category out to its own worker; both produce identical results.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::warn;
use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::{self, PatternCatalog};
use crate::config::{CatalogConfig, PhiCategory};
use crate::filter::filter_matches;
use crate::heuristics::{NameHeuristic, NAME_HEURISTIC_CONFIDENCE};
use crate::redaction;
use crate::scan_match::{log_match_debug, PhiMatch, ScanResult};
use crate::validators::passes_programmatic_validation;

/// Per-call scan options.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Restricts which categories are checked; `None` means all known.
    pub categories: Option<HashSet<PhiCategory>>,
    /// Drops detections below this confidence. 0.0 means no filtering.
    pub min_confidence: f64,
    /// Whether to also produce `redacted_text`. Scanning without redaction
    /// is cheaper.
    pub redact: bool,
    /// Execution strategy hint: fan categories out to worker threads.
    pub parallel: bool,
}

// ---------- Convenience builder methods for ScanOptions ----------
impl ScanOptions {
    pub fn with_categories<I: IntoIterator<Item = PhiCategory>>(mut self, categories: I) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Lenient by-name variant of [`Self::with_categories`]: unknown category
    /// names are ignored with a warning rather than rejected, so callers can
    /// pass through externally supplied lists unchecked.
    pub fn with_category_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        let mut set = HashSet::new();
        for name in names {
            match PhiCategory::parse(name.as_ref()) {
                Ok(category) => {
                    set.insert(category);
                }
                Err(_) => warn!("Ignoring unknown PHI category '{}'.", name.as_ref()),
            }
        }
        self.categories = Some(set);
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
// -----------------------------------------------------------------

/// Orchestrates pattern and heuristic application over input text.
#[derive(Debug)]
pub struct PhiScanner {
    catalog: Arc<PatternCatalog>,
    heuristic: NameHeuristic,
}

impl PhiScanner {
    /// Creates a scanner over a compiled catalog. The name heuristic adopts
    /// the catalog's NAME redaction token when one is configured.
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        let heuristic = match catalog.replacement_for(PhiCategory::Name) {
            Some(token) => NameHeuristic::with_replacement(token.to_string()),
            None => NameHeuristic::new(),
        };
        Self { catalog, heuristic }
    }

    /// Creates a scanner over the built-in default catalog.
    pub fn with_default_catalog() -> Result<Self> {
        let config = CatalogConfig::load_default()?;
        Ok(Self::new(catalog::get_or_compile(&config)?))
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Scans `text` and returns the filtered, canonically sorted result.
    ///
    /// Empty text yields an empty result. Requested categories the catalog
    /// has no patterns for contribute nothing; that is a normal outcome, not
    /// an error.
    pub fn scan(&self, text: &str, options: &ScanOptions) -> ScanResult {
        if text.is_empty() {
            return ScanResult::default();
        }

        // Canonical category order keeps sequential and parallel output
        // identical regardless of the requested set's iteration order.
        let requested: Vec<PhiCategory> = PhiCategory::ALL
            .into_iter()
            .filter(|c| options.categories.as_ref().map_or(true, |set| set.contains(c)))
            .collect();

        let raw = if options.parallel {
            self.scan_parallel(text, &requested, options.min_confidence)
        } else {
            self.scan_sequential(text, &requested, options.min_confidence)
        };

        let mut matches = filter_matches(raw, options.min_confidence, None);
        redaction::sort_canonical(&mut matches);

        let redacted_text = options
            .redact
            .then(|| redaction::apply(text, &matches));

        ScanResult::new(matches, redacted_text)
    }

    fn scan_sequential(
        &self,
        text: &str,
        requested: &[PhiCategory],
        min_confidence: f64,
    ) -> Vec<PhiMatch> {
        requested
            .iter()
            .flat_map(|&category| self.scan_category(text, category, min_confidence))
            .collect()
    }

    /// Fans each category out to its own scoped worker thread. Workers share
    /// only the read-only catalog and input text; each writes to a private
    /// result list, and results are gathered in submission order after the
    /// join barrier so output matches the sequential mode exactly.
    fn scan_parallel(
        &self,
        text: &str,
        requested: &[PhiCategory],
        min_confidence: f64,
    ) -> Vec<PhiMatch> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = requested
                .iter()
                .map(|&category| {
                    scope.spawn(move || self.scan_category(text, category, min_confidence))
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(matches) => matches,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    /// Runs every eligible pattern of one category over the text, plus the
    /// name heuristic for the NAME category.
    fn scan_category(
        &self,
        text: &str,
        category: PhiCategory,
        min_confidence: f64,
    ) -> Vec<PhiMatch> {
        let mut matches = Vec::new();

        for pattern in self.catalog.patterns_for(category) {
            if pattern.confidence < min_confidence {
                continue;
            }
            for found in pattern.regex.find_iter(text) {
                if !passes_programmatic_validation(pattern, found.as_str()) {
                    continue;
                }
                log_match_debug(module_path!(), &pattern.name, found.as_str());
                matches.push(PhiMatch {
                    category,
                    pattern_name: pattern.name.clone(),
                    matched_text: found.as_str().to_string(),
                    start: found.start(),
                    end: found.end(),
                    confidence: pattern.confidence,
                    replacement: pattern.replacement.clone(),
                });
            }
        }

        if category == PhiCategory::Name && NAME_HEURISTIC_CONFIDENCE >= min_confidence {
            matches.extend(self.heuristic.detect(text));
        }

        matches
    }
}
