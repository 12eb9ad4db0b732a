//! Catalog configuration management for `phiscrub-core`.
//!
//! This module defines the core data structures for PHI pattern catalogs.
//! It handles serialization/deserialization of YAML catalog files and provides
//! utilities for loading, merging, and validating these configs before they
//! are compiled into a [`crate::catalog::PatternCatalog`].
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::PhiScrubError;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The closed set of PHI categories the library knows about.
///
/// Catalog files key their sections by the SCREAMING_SNAKE_CASE form
/// (`SSN`, `MEDICAL_RECORD`, ...). An unknown category name in a catalog
/// file fails loading; a silently dropped category would be a compliance
/// gap, so there are no free-form categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhiCategory {
    Ssn,
    Email,
    Phone,
    Dob,
    MedicalRecord,
    Address,
    Name,
}

impl PhiCategory {
    /// Canonical scan order. Sequential and parallel scans both walk
    /// categories in this order so their outputs are comparable.
    pub const ALL: [PhiCategory; 7] = [
        PhiCategory::Ssn,
        PhiCategory::Email,
        PhiCategory::Phone,
        PhiCategory::Dob,
        PhiCategory::MedicalRecord,
        PhiCategory::Address,
        PhiCategory::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhiCategory::Ssn => "SSN",
            PhiCategory::Email => "EMAIL",
            PhiCategory::Phone => "PHONE",
            PhiCategory::Dob => "DOB",
            PhiCategory::MedicalRecord => "MEDICAL_RECORD",
            PhiCategory::Address => "ADDRESS",
            PhiCategory::Name => "NAME",
        }
    }

    /// Parses a category name, accepting a few common aliases.
    pub fn parse(s: &str) -> Result<Self, PhiScrubError> {
        match s.to_uppercase().as_str() {
            "SSN" => Ok(PhiCategory::Ssn),
            "EMAIL" => Ok(PhiCategory::Email),
            "PHONE" => Ok(PhiCategory::Phone),
            "DOB" | "DATE_OF_BIRTH" => Ok(PhiCategory::Dob),
            "MEDICAL_RECORD" | "MRN" => Ok(PhiCategory::MedicalRecord),
            "ADDRESS" => Ok(PhiCategory::Address),
            "NAME" => Ok(PhiCategory::Name),
            _ => Err(PhiScrubError::UnknownCategory(s.to_string())),
        }
    }
}

impl fmt::Display for PhiCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhiCategory {
    type Err = PhiScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhiCategory::parse(s)
    }
}

/// A single pattern specification inside a catalog file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternSpec {
    /// The regex pattern string.
    pub regex: String,
    /// Static confidence in [0, 1] copied onto every match this pattern produces.
    pub confidence: f64,
    /// Human-readable description of what the pattern targets.
    pub description: Option<String>,
    /// If true, the regex is compiled case-insensitively.
    pub case_insensitive: bool,
    /// If true, enables multiline mode for the regex engine.
    pub multi_line: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_all: bool,
    /// If true, matches additionally run the category's structural validator.
    pub programmatic_validation: bool,
    /// Explicit override for enabling/disabling the pattern.
    pub enabled: Option<bool>,
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self {
            regex: String::new(),
            confidence: 0.5,
            description: None,
            case_insensitive: false,
            multi_line: false,
            dot_all: false,
            programmatic_validation: false,
            enabled: None,
        }
    }
}

impl Hash for PatternSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.regex.hash(state);
        self.confidence.to_bits().hash(state);
        self.description.hash(state);
        self.case_insensitive.hash(state);
        self.multi_line.hash(state);
        self.dot_all.hash(state);
        self.programmatic_validation.hash(state);
        self.enabled.hash(state);
    }
}

/// Per-category section of a catalog file.
#[derive(Debug, Clone, PartialEq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Template producing the redaction token; `{category}` expands to the
    /// category name.
    pub replacement_format: String,
    /// Named pattern specs. A `BTreeMap` keeps iteration order deterministic.
    pub patterns: BTreeMap<String, PatternSpec>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            replacement_format: "[REDACTED-{category}]".to_string(),
            patterns: BTreeMap::new(),
        }
    }
}

/// Represents the top-level catalog configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Hash, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Category sections, keyed by the closed category enum.
    #[serde(default)]
    pub categories: BTreeMap<PhiCategory, CategoryConfig>,
}

impl CatalogConfig {
    /// Loads a catalog configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading PHI catalog from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let config: CatalogConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;

        config.validate()?;
        info!(
            "Loaded {} categories from file {}.",
            config.categories.len(),
            path.display()
        );

        Ok(config)
    }

    /// Loads the built-in default catalog from the embedded configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default PHI catalog from embedded string...");
        let default_yaml = include_str!("../config/default_patterns.yaml");
        let config: CatalogConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default catalog")?;

        config.validate()?;
        debug!("Loaded {} default categories.", config.categories.len());
        Ok(config)
    }

    /// Validates structural integrity: non-empty names and patterns,
    /// confidence ranges, and the pattern-length cap. Regex compilation
    /// itself happens in [`crate::catalog::PatternCatalog::compile`] and is
    /// equally fatal there.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for (category, cc) in &self.categories {
            if cc.replacement_format.trim().is_empty() {
                errors.push(format!("Category {category} has an empty `replacement_format`."));
            }
            for (name, spec) in &cc.patterns {
                if name.trim().is_empty() {
                    errors.push(format!("Category {category} has a pattern with an empty name."));
                }
                if spec.regex.is_empty() {
                    errors.push(format!("Pattern '{name}' ({category}) has an empty `regex` field."));
                }
                if spec.regex.len() > MAX_PATTERN_LENGTH {
                    errors.push(format!(
                        "Pattern '{name}' ({category}) exceeds the maximum pattern length of {MAX_PATTERN_LENGTH}."
                    ));
                }
                if !(0.0..=1.0).contains(&spec.confidence) {
                    errors.push(format!(
                        "Pattern '{name}' ({category}) has confidence {} outside [0, 1].",
                        spec.confidence
                    ));
                }
            }
        }

        if !errors.is_empty() {
            Err(anyhow!("Catalog validation failed:\n{}", errors.join("\n")))
        } else {
            Ok(())
        }
    }
}

/// Merges a user-supplied catalog over the defaults.
///
/// User categories override per pattern name; a user `replacement_format`
/// replaces the default one for that category.
pub fn merge_configs(default_config: CatalogConfig, user_config: Option<CatalogConfig>) -> CatalogConfig {
    debug!(
        "merge_configs called. Initial default category count: {}",
        default_config.categories.len()
    );

    let mut merged = default_config;

    if let Some(user_cfg) = user_config {
        debug!("User catalog provided. Merging {} categories.", user_cfg.categories.len());
        for (category, user_cc) in user_cfg.categories {
            match merged.categories.get_mut(&category) {
                Some(existing) => {
                    existing.replacement_format = user_cc.replacement_format;
                    for (name, spec) in user_cc.patterns {
                        existing.patterns.insert(name, spec);
                    }
                }
                None => {
                    merged.categories.insert(category, user_cc);
                }
            }
        }
    }

    debug!("Final category count after merge: {}", merged.categories.len());
    merged
}

/// Candidate directories searched for user catalog files, most specific first.
pub fn catalog_candidate_paths() -> Vec<PathBuf> {
    let candidates = vec![
        dirs::home_dir().map(|p| p.join(".phiscrub").join("catalogs")),
        dirs::config_dir().map(|p| p.join("phiscrub").join("catalogs")),
        Some(PathBuf::from("/etc/phiscrub/catalogs")),
        Some(PathBuf::from("./config")),
    ];
    candidates.into_iter().flatten().collect()
}

/// Lists `*.yaml` catalog files found in the candidate directories.
/// Best-effort: unreadable directories are skipped with a debug log.
pub fn list_available_catalogs() -> Vec<PathBuf> {
    let mut out = Vec::new();
    for dir in catalog_candidate_paths() {
        match std::fs::read_dir(&dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|s| s.to_str()) == Some("yaml") {
                        debug!("Found candidate catalog at: {}", path.display());
                        out.push(path);
                    }
                }
            }
            Err(_) => debug!("Candidate catalog directory not found: {}", dir.display()),
        }
    }
    out
}

/// Loads `<name>.yaml` from the first candidate directory containing it.
pub fn load_catalog_by_name(name: &str) -> Result<CatalogConfig> {
    for dir in catalog_candidate_paths() {
        let path = dir.join(format!("{name}.yaml"));
        if path.is_file() {
            return CatalogConfig::load_from_file(&path);
        }
    }
    warn!("No catalog named '{name}' found in candidate directories.");
    Err(anyhow!("Catalog '{name}' not found."))
}
