// phiscrub-core/src/lib.rs
//! # PhiScrub Core Library
//!
//! `phiscrub-core` provides the fundamental, platform-independent logic for
//! detecting and redacting Protected Health Information (PHI) in free text.
//! It defines the pattern catalog and its YAML configuration format, a
//! scanner producing typed, span-accurate matches, and a redaction engine
//! with a deterministic overlap-resolution policy.
//!
//! The library is designed to be pure and stateless: catalog loading is the
//! only I/O-bearing operation, performed once at startup, and `scan`/`redact`
//! are side-effect free transformations of their inputs.
//!
//! ## Modules
//!
//! * `config`: Defines `PatternSpec`s and `CatalogConfig` for specifying PHI patterns.
//! * `catalog`: Compiles configurations into the immutable `PatternCatalog`.
//! * `heuristics`: Supplementary person-name detection for the NAME category.
//! * `scanner`: The `PhiScanner` with sequential and parallel execution modes.
//! * `filter`: The authoritative confidence/category post-filter.
//! * `redaction`: Rewrites matched spans with redaction tokens.
//! * `validators`: Structural validation for SSN and date candidates.
//! * `scan_match`: Data structures for matches and scan results.
//! * `audit`: Append-only JSONL logging of scan events, hash-referenced.
//! * `headless`: Convenience wrappers for one-shot sanitization.
//!
//! ## Usage Example
//!
//! ```rust
//! use phiscrub_core::{get_or_compile, CatalogConfig, PhiScanner, ScanOptions};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Load the built-in default catalog and compile it.
//!     let config = CatalogConfig::load_default()?;
//!     let catalog = get_or_compile(&config)?;
//!
//!     // 2. Scan some content, requesting a redacted copy.
//!     let scanner = PhiScanner::new(catalog);
//!     let options = ScanOptions::default().with_redaction(true);
//!     let result = scanner.scan("Patient SSN: 123-45-6789", &options);
//!
//!     assert!(result.detected);
//!     assert_eq!(
//!         result.redacted_text.as_deref(),
//!         Some("Patient SSN: [REDACTED-SSN]")
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Catalog construction errors are always surfaced; an incomplete PHI
//! catalog is a compliance risk, so there are no partial catalogs. Scanning
//! itself never fails: "no PHI found" is a normal result, and unknown
//! requested categories are a lenient no-op. The library uses
//! `anyhow::Error` at loading boundaries and the typed [`PhiScrubError`]
//! for programmatic handling.
//!
//! ## Design Principles
//!
//! * **Immutable catalog:** compiled once, shared by reference, safe for
//!   concurrent scans without locking.
//! * **Deterministic:** canonical match ordering and overlap resolution make
//!   scan and redaction output reproducible.
//! * **PHI-safe logging:** matched values are hashed or elided before they
//!   reach any log line.
//!
//! ---
//! License: MIT OR Apache-2.0

// All modules must be declared before they can be used.
pub mod audit;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod filter;
pub mod headless;
pub mod heuristics;
pub mod redaction;
pub mod scan_match;
pub mod scanner;
pub mod validators;

/// Re-exports the public configuration types and functions for managing PHI catalogs.
pub use config::{
    catalog_candidate_paths,
    list_available_catalogs,
    load_catalog_by_name,
    merge_configs,
    CatalogConfig,
    CategoryConfig,
    PatternSpec,
    PhiCategory,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::PhiScrubError;

/// Re-exports the compiled catalog types and the caching compiler entry point.
pub use catalog::{get_or_compile, render_replacement, PatternCatalog, PhiPattern};

/// Re-exports types for matches, scan results, and PHI-safe reporting.
pub use scan_match::{canonical_sample_hash, redact_sensitive, PhiMatch, ScanResult};

/// Re-exports the scanner and its options.
pub use scanner::{PhiScanner, ScanOptions};

/// Re-exports the authoritative post-filter.
pub use filter::filter_matches;

/// Re-exports the redaction entry point.
pub use redaction::redact;

/// Re-exports the supplementary name detector.
pub use heuristics::{NameHeuristic, NAME_HEURISTIC_CONFIDENCE};

/// Re-exports the audit log types for scan event logging.
pub use audit::{ScanAuditLog, ScanRecord};

/// Re-exports functions for one-shot, non-interactive use.
pub use headless::{scrub_string, scrub_string_with_defaults};
