//! Marker filter and student-ID scan.
//!
//! The whole logical core of the tool lives here: decide which pages belong
//! to the course, then harvest every ID-shaped token off those pages. Both
//! rules are pure functions over extracted text, which keeps them trivially
//! testable without a PDF in sight.

use crate::output::PageScan;
use crate::pipeline::pages::PageText;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// The fixed student-ID shape: two digits, five digits, one digit,
/// hyphen-separated, on word boundaries.
pub const STUDENT_ID_PATTERN: &str = r"\b\d{2}-\d{5}-\d\b";

static RE_STUDENT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(STUDENT_ID_PATTERN).unwrap());

/// Does this page belong to the course?
///
/// Case-insensitive substring containment; the marker is usually already
/// upper case but custom markers are folded too.
pub fn page_matches_course(text: &str, marker: &str) -> bool {
    text.to_uppercase().contains(&marker.to_uppercase())
}

/// Collect all non-overlapping ID matches in one page's text, in order.
pub fn scan_ids(text: &str) -> Vec<String> {
    RE_STUDENT_ID
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Run the marker filter and ID scan over all pages.
///
/// Returns the deduplicated ID set and a per-page record for each page.
/// Non-marker pages are never scanned for IDs, so an ID-shaped token on an
/// unrelated roster page does not leak into the result.
pub fn sift_pages(pages: &[PageText], marker: &str) -> (BTreeSet<String>, Vec<PageScan>) {
    let mut ids = BTreeSet::new();
    let mut records = Vec::with_capacity(pages.len());

    for page in pages {
        let matched = page_matches_course(&page.text, marker);
        let mut ids_found = 0usize;

        if matched {
            for id in scan_ids(&page.text) {
                ids_found += 1;
                ids.insert(id);
            }
        }

        records.push(PageScan {
            page_num: page.page_num,
            chars: page.text.chars().count(),
            matched,
            ids_found,
        });
    }

    (ids, records)
}
