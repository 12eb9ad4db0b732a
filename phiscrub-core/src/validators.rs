// File: phiscrub-core/src/validators.rs
//! Programmatic validation functions for specific PHI types.
//!
//! This module provides additional validation logic beyond regular expression
//! matching for PHI such as SSNs and dates of birth. These functions help
//! reduce false positives by applying structural and known invalid pattern
//! checks to regex candidates.
//!
//! License: MIT OR APACHE 2.0

use chrono::NaiveDate;

use crate::catalog::PhiPattern;
use crate::config::PhiCategory;

/// Validates an SSN candidate against US Social Security Administration rules.
///
/// This implementation aims for a robust programmatic check without external
/// data. Non-digit separators are stripped first, so both dashed and plain
/// forms validate.
///
/// # Arguments
///
/// * `ssn` - The SSN candidate string slice.
///
/// # Returns
///
/// `true` if the candidate passes basic structural and invalid pattern checks,
/// `false` otherwise.
pub fn is_valid_ssn(ssn: &str) -> bool {
    let digits: String = ssn.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 {
        return false;
    }

    let Ok(area_num) = digits[0..3].parse::<u16>() else { return false; };
    let Ok(group_num) = digits[3..5].parse::<u8>() else { return false; };
    let Ok(serial_num) = digits[5..9].parse::<u16>() else { return false; };

    // Invalid SSN patterns based on historical and current SSA rules.
    let invalid_area = (area_num == 0) || (area_num == 666) || (area_num >= 900);
    let invalid_group = group_num == 0;
    let invalid_serial = serial_num == 0;

    !(invalid_area || invalid_group || invalid_serial)
}

// Formats the DOB regex patterns can produce; whitespace in chrono formats is
// matched loosely, and month names parse case-insensitively.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y"];

/// Checks whether a date candidate names a real calendar date.
///
/// Rejects regex candidates like `13/45/2020` or `February 31, 1990` that
/// are shaped like dates but do not exist.
pub fn is_plausible_date(candidate: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(candidate, fmt).is_ok())
}

/// Runs the category-specific validator for patterns that request it.
/// Categories without a structural validator accept every regex candidate.
pub(crate) fn passes_programmatic_validation(pattern: &PhiPattern, candidate: &str) -> bool {
    if !pattern.programmatic_validation {
        return true;
    }
    match pattern.category {
        PhiCategory::Ssn => is_valid_ssn(candidate),
        PhiCategory::Dob => is_plausible_date(candidate),
        _ => true,
    }
}
