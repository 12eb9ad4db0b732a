//! catalog.rs - Compilation and caching of PHI pattern catalogs.
//!
//! This module converts a validated [`CatalogConfig`] into a
//! [`PatternCatalog`] of compiled regexes grouped by category, ready for
//! efficient scanning. A thread-safe, global cache keyed by a hash of the
//! config avoids redundant compilation. Compilation is all-or-nothing: a
//! single bad pattern fails the whole catalog, never a partial one.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};
use tinytemplate::TinyTemplate;

use crate::config::{CatalogConfig, PhiCategory, MAX_PATTERN_LENGTH};
use crate::errors::PhiScrubError;

/// A single compiled PHI detection pattern.
///
/// Holds a compiled regular expression along with the metadata every match
/// it produces will carry.
#[derive(Debug)]
pub struct PhiPattern {
    /// Unique name of the pattern within its category.
    pub name: String,
    /// The category this pattern detects.
    pub category: PhiCategory,
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Static confidence copied onto every match.
    pub confidence: f64,
    /// Pre-rendered redaction token for this category.
    pub replacement: String,
    /// A flag indicating if matches require additional structural validation.
    pub programmatic_validation: bool,
}

/// The compiled, immutable pattern catalog used by every scan.
///
/// Constructed once, then shared by reference (typically `Arc`) across
/// scanners and threads; it is never mutated after compilation.
#[derive(Debug, Default)]
pub struct PatternCatalog {
    patterns: BTreeMap<PhiCategory, Vec<PhiPattern>>,
    replacements: BTreeMap<PhiCategory, String>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled catalogs.
    /// The key is a hash of the `CatalogConfig`.
    static ref COMPILED_CATALOG_CACHE: RwLock<HashMap<u64, Arc<PatternCatalog>>> =
        RwLock::new(HashMap::new());
}

/// Renders a `replacement_format` template for a category.
///
/// The template context exposes a single `category` value, so
/// `"[REDACTED-{category}]"` renders to `"[REDACTED-SSN]"` and so on.
pub fn render_replacement(format: &str, category: PhiCategory) -> Result<String, PhiScrubError> {
    let mut tt = TinyTemplate::new();
    tt.add_template("t", format)
        .map_err(|e| PhiScrubError::InvalidReplacementTemplate(category, e.to_string()))?;
    let ctx = serde_json::json!({ "category": category.as_str() });
    tt.render("t", &ctx)
        .map_err(|e| PhiScrubError::InvalidReplacementTemplate(category, e.to_string()))
}

impl PatternCatalog {
    /// Compiles a catalog configuration into a `PatternCatalog`.
    ///
    /// Any compilation failure aborts construction with the offending
    /// pattern's name and category; there are no partial catalogs.
    pub fn compile(config: &CatalogConfig) -> Result<Self, PhiScrubError> {
        debug!("Starting compilation of {} categories.", config.categories.len());

        let mut patterns: BTreeMap<PhiCategory, Vec<PhiPattern>> = BTreeMap::new();
        let mut replacements: BTreeMap<PhiCategory, String> = BTreeMap::new();
        let mut compilation_errors: Vec<PhiScrubError> = Vec::new();

        for (&category, cc) in &config.categories {
            let replacement = render_replacement(&cc.replacement_format, category)?;
            replacements.insert(category, replacement.clone());

            let compiled = patterns.entry(category).or_default();
            for (name, spec) in &cc.patterns {
                if spec.enabled == Some(false) {
                    warn!("Skipping disabled pattern '{}' ({category}).", name);
                    continue;
                }

                if spec.regex.len() > MAX_PATTERN_LENGTH {
                    compilation_errors.push(PhiScrubError::PatternLengthExceeded(
                        name.clone(),
                        spec.regex.len(),
                        MAX_PATTERN_LENGTH,
                    ));
                    continue;
                }

                let regex_result = RegexBuilder::new(&spec.regex)
                    .case_insensitive(spec.case_insensitive)
                    .multi_line(spec.multi_line)
                    .dot_matches_new_line(spec.dot_all)
                    .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
                    .build();

                match regex_result {
                    Ok(regex) => {
                        debug!("Pattern '{}' ({category}) compiled successfully.", name);
                        compiled.push(PhiPattern {
                            name: name.clone(),
                            category,
                            regex,
                            confidence: spec.confidence,
                            replacement: replacement.clone(),
                            programmatic_validation: spec.programmatic_validation,
                        });
                    }
                    Err(e) => {
                        compilation_errors.push(PhiScrubError::PatternCompilation {
                            pattern: name.clone(),
                            category,
                            source: e,
                        });
                    }
                }
            }
        }

        match compilation_errors.len() {
            0 => {
                debug!(
                    "Finished compiling catalog. Total patterns: {}.",
                    patterns.values().map(Vec::len).sum::<usize>()
                );
                Ok(Self { patterns, replacements })
            }
            1 => Err(compilation_errors.remove(0)),
            n => {
                let error_message = compilation_errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<String>>()
                    .join("\n");
                Err(PhiScrubError::Fatal(format!(
                    "Failed to compile {n} pattern(s):\n{error_message}"
                )))
            }
        }
    }

    /// Returns the categories this catalog was configured with, in canonical
    /// order. A category may be present with zero compiled patterns.
    pub fn categories(&self) -> Vec<PhiCategory> {
        self.replacements.keys().copied().collect()
    }

    /// Returns the compiled patterns for a category, or an empty slice if the
    /// catalog has none for it.
    pub fn patterns_for(&self, category: PhiCategory) -> &[PhiPattern] {
        self.patterns.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the pre-rendered redaction token for a category, if configured.
    pub fn replacement_for(&self, category: PhiCategory) -> Option<&str> {
        self.replacements.get(&category).map(String::as_str)
    }
}

/// Hashes the `CatalogConfig` to create a stable, unique key for the cache.
/// `BTreeMap` iteration order makes the hash deterministic without sorting.
fn hash_config(config: &CatalogConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.hash(&mut hasher);
    hasher.finish()
}

/// Gets a compiled `PatternCatalog` from the cache or compiles it if absent.
///
/// This is the public entry point for retrieving compiled catalogs. It
/// returns an `Arc`, allowing for cheap sharing across scanners and threads.
pub fn get_or_compile(config: &CatalogConfig) -> Result<Arc<PatternCatalog>> {
    let cache_key = hash_config(config);

    {
        let cache = COMPILED_CATALOG_CACHE.read().unwrap();
        if let Some(catalog) = cache.get(&cache_key) {
            debug!("Serving compiled catalog from cache for key: {}", &cache_key);
            return Ok(Arc::clone(catalog));
        }
    } // Read lock is released here.

    debug!("Compiled catalog not found in cache. Compiling now.");
    let compiled = PatternCatalog::compile(config)?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_CATALOG_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Successfully compiled and cached catalog for key: {}", &cache_key);
    Ok(compiled_arc)
}
