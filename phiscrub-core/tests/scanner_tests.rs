// phiscrub-core/tests/scanner_tests.rs
use phiscrub_core::config::{CatalogConfig, CategoryConfig, PatternSpec, PhiCategory};
use phiscrub_core::{get_or_compile, PhiScanner, ScanOptions};

fn default_scanner() -> PhiScanner {
    PhiScanner::with_default_catalog().unwrap()
}

#[test]
fn detects_canonical_ssn() {
    let result = default_scanner().scan("SSN: 123-45-6789", &ScanOptions::default());
    assert!(result.detected);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].category, PhiCategory::Ssn);
    assert_eq!(result.matches[0].matched_text, "123-45-6789");
    assert!(result.matches[0].confidence >= 0.9);
    assert!(result.highest_confidence >= 0.9);
}

#[test]
fn detects_canonical_email() {
    let result = default_scanner().scan("Contact: john.doe@example.com", &ScanOptions::default());
    assert!(result.detected);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].category, PhiCategory::Email);
    assert_eq!(result.matches[0].matched_text, "john.doe@example.com");
}

#[test]
fn detects_canonical_phone() {
    let result = default_scanner().scan("Call (555) 123-4567", &ScanOptions::default());
    assert!(result.detected);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].category, PhiCategory::Phone);
}

#[test]
fn clean_text_yields_no_detection() {
    let result = default_scanner().scan(
        "No PHI here, just numbers 42 and words.",
        &ScanOptions::default(),
    );
    assert!(!result.detected);
    assert!(result.matches.is_empty());
    assert_eq!(result.highest_confidence, 0.0);
    assert!(result.redacted_text.is_none());
}

#[test]
fn empty_text_yields_empty_result() {
    let result = default_scanner().scan("", &ScanOptions::default());
    assert!(!result.detected);
    assert!(result.matches.is_empty());
}

#[test]
fn ssn_failing_structural_validation_is_dropped() {
    let result = default_scanner().scan("SSN: 666-45-6789", &ScanOptions::default());
    assert!(!result.matches.iter().any(|m| m.category == PhiCategory::Ssn));
}

#[test]
fn impossible_date_is_dropped() {
    let scanner = default_scanner();
    let plausible = scanner.scan("DOB: 4/15/1987", &ScanOptions::default());
    assert!(plausible.matches.iter().any(|m| m.category == PhiCategory::Dob));

    let impossible = scanner.scan("DOB: 13/45/1987", &ScanOptions::default());
    assert!(!impossible.matches.iter().any(|m| m.category == PhiCategory::Dob));
}

#[test]
fn category_restriction_limits_detections() {
    let scanner = default_scanner();
    let text = "SSN 123-45-6789 and mail nurse@example.org";

    let options = ScanOptions::default().with_categories([PhiCategory::Email]);
    let result = scanner.scan(text, &options);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].category, PhiCategory::Email);
}

#[test]
fn unknown_category_names_are_ignored_leniently() {
    let scanner = default_scanner();
    let text = "SSN 123-45-6789 and mail nurse@example.org";

    let options = ScanOptions::default().with_category_names(&["EMAIL", "RETINA_SCAN"]);
    let result = scanner.scan(text, &options);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].category, PhiCategory::Email);

    // A request consisting solely of unknown names scans nothing.
    let options = ScanOptions::default().with_category_names(&["RETINA_SCAN", "GAIT"]);
    let result = scanner.scan(text, &options);
    assert!(!result.detected);
}

#[test]
fn raising_min_confidence_never_adds_matches() {
    let scanner = default_scanner();
    let text = "Dr. Smith saw John Smith (MRN: 123456) on 4/15/1987 at 123 Main Street. \
                Reach nurse@example.org or (555) 123-4567. SSN 123-45-6789.";

    let mut previous = usize::MAX;
    for threshold in [0.0, 0.6, 0.75, 0.85, 0.9, 0.95, 1.0] {
        let options = ScanOptions::default().with_min_confidence(threshold);
        let count = scanner.scan(text, &options).matches.len();
        assert!(
            count <= previous,
            "threshold {threshold} increased match count from {previous} to {count}"
        );
        previous = count;
    }
}

#[test]
fn spans_slice_back_to_matched_text() {
    let scanner = default_scanner();
    // Multi-byte characters ahead of the matches exercise byte-offset handling.
    let text = "Résumé für John Smith — SSN 123-45-6789, mail john.smith@example.org";
    let result = scanner.scan(text, &ScanOptions::default());

    assert!(result.detected);
    for m in &result.matches {
        assert!(m.start < m.end && m.end <= text.len());
        assert_eq!(&text[m.start..m.end], m.matched_text);
    }
}

#[test]
fn matches_are_sorted_by_start_then_longest() {
    // Two categories matching at the same offset with different lengths.
    let mut long_cc = CategoryConfig {
        replacement_format: "[LONG]".to_string(),
        ..Default::default()
    };
    long_cc.patterns.insert(
        "record_full".to_string(),
        PatternSpec {
            regex: r"ID-\d{4}-\d{4}".to_string(),
            confidence: 0.9,
            ..Default::default()
        },
    );
    let mut short_cc = CategoryConfig {
        replacement_format: "[SHORT]".to_string(),
        ..Default::default()
    };
    short_cc.patterns.insert(
        "record_stub".to_string(),
        PatternSpec {
            regex: r"ID-\d{4}".to_string(),
            confidence: 0.9,
            ..Default::default()
        },
    );
    let mut config = CatalogConfig::default();
    config.categories.insert(PhiCategory::MedicalRecord, long_cc);
    config.categories.insert(PhiCategory::Address, short_cc);

    let scanner = PhiScanner::new(get_or_compile(&config).unwrap());
    let result = scanner.scan("ref ID-1234-5678 end", &ScanOptions::default());

    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.matches[0].matched_text, "ID-1234-5678");
    assert_eq!(result.matches[1].matched_text, "ID-1234");
    assert_eq!(result.matches[0].start, result.matches[1].start);
}

#[test]
fn name_heuristic_flows_through_scanner() {
    let scanner = default_scanner();
    let result = scanner.scan("Seen by Mary Jones", &ScanOptions::default());
    assert!(result.detected);
    assert_eq!(result.matches[0].category, PhiCategory::Name);
    assert_eq!(result.matches[0].confidence, 0.6);

    // The heuristic's fixed confidence sits below deterministic patterns.
    let options = ScanOptions::default().with_min_confidence(0.7);
    let result = scanner.scan("Seen by Mary Jones", &options);
    assert!(!result.detected);
}

#[test_log::test]
fn sequential_and_parallel_modes_are_equivalent() {
    let scanner = default_scanner();
    let texts = [
        "",
        "No PHI here, just numbers 42 and words.",
        "SSN: 123-45-6789",
        "Dr. Smith saw John Smith (MRN: 123456) on 4/15/1987 at 123 Main Street. \
         Reach john.smith@example.org or (555) 123-4567. SSN 123-45-6789.",
        "Emails a@b.io c@d.io; phones (555) 123-4567 +1 555 987 6543; born January 5, 1990.",
    ];

    for text in texts {
        let sequential = scanner.scan(text, &ScanOptions::default());
        let parallel = scanner.scan(text, &ScanOptions::default().with_parallel(true));
        assert_eq!(sequential, parallel, "modes diverged on: {text}");
    }
}

#[test]
fn parallel_mode_respects_options() {
    let scanner = default_scanner();
    let text = "SSN 123-45-6789 and mail nurse@example.org";
    let options = ScanOptions::default()
        .with_parallel(true)
        .with_categories([PhiCategory::Email])
        .with_min_confidence(0.9);
    let result = scanner.scan(text, &options);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].category, PhiCategory::Email);
}
