//! errors.rs - Custom error types for the phiscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

use crate::config::PhiCategory;

/// This enum represents all possible error types in the `phiscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PhiScrubError {
    #[error("Failed to compile pattern '{pattern}' for category {category}: {source}")]
    PatternCompilation {
        pattern: String,
        category: PhiCategory,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Unknown PHI category: '{0}'")]
    UnknownCategory(String),

    #[error("Invalid replacement template for category {0}: {1}")]
    InvalidReplacementTemplate(PhiCategory, String),

    #[error("Match span {start}..{end} is out of bounds for text of length {len}")]
    InvalidMatchSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
