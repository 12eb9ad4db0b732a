// phiscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot, non-interactive use of the scanner.
//! Compiles the catalog, scans with redaction enabled, and hands back the
//! sanitized text in a single call.

use anyhow::Result;

use crate::catalog;
use crate::config::CatalogConfig;
use crate::scanner::{PhiScanner, ScanOptions};

/// Fully sanitizes an input string by scanning and applying all redactions.
/// This function is the primary entry point for one-shot use.
///
/// # Arguments
///
/// * `config` - The catalog configuration (defaults or merged user overrides).
/// * `options` - Scan options; redaction is forced on regardless of its `redact` flag.
/// * `content` - The string to be sanitized.
pub fn scrub_string(config: &CatalogConfig, options: &ScanOptions, content: &str) -> Result<String> {
    let catalog = catalog::get_or_compile(config)?;
    let scanner = PhiScanner::new(catalog);

    let options = options.clone().with_redaction(true);
    let result = scanner.scan(content, &options);

    Ok(result
        .redacted_text
        .unwrap_or_else(|| content.to_string()))
}

/// One-shot sanitization against the built-in default catalog.
pub fn scrub_string_with_defaults(content: &str) -> Result<String> {
    let config = CatalogConfig::load_default()?;
    scrub_string(&config, &ScanOptions::default(), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use crate::config::{CategoryConfig, PatternSpec, PhiCategory};

    #[test]
    fn test_scrub_string_with_custom_catalog() -> Result<()> {
        let mut cc = CategoryConfig::default();
        cc.patterns.insert(
            "email_basic".to_string(),
            PatternSpec {
                regex: r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}".to_string(),
                confidence: 0.95,
                ..Default::default()
            },
        );
        let mut config = CatalogConfig::default();
        config.categories.insert(PhiCategory::Email, cc);

        let content = "My email is test@example.com, and another is another@example.net.";
        let sanitized = scrub_string(&config, &ScanOptions::default(), content)?;

        assert_eq!(
            sanitized,
            "My email is [REDACTED-EMAIL], and another is [REDACTED-EMAIL]."
        );
        Ok(())
    }

    #[test]
    fn test_scrub_string_with_defaults_passes_clean_text_through() -> Result<()> {
        let content = "No PHI here, just numbers 42 and words.";
        let sanitized = scrub_string_with_defaults(content)?;
        assert_eq!(sanitized, content);
        Ok(())
    }
}
