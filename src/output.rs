//! Output types returned by the scan entry points.
//!
//! Everything here is `Serialize` so the CLI's `--json` mode can dump the
//! whole result for downstream tooling without a second code path.

use serde::{Deserialize, Serialize};

/// Result of a roster scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Distinct student IDs found on marker pages, sorted ascending.
    ///
    /// Uniqueness is guaranteed; the sort is for deterministic output only;
    /// callers must not attach meaning to the order.
    pub student_ids: Vec<String>,

    /// Per-page scan records, in document page order. Pages whose text could
    /// not be extracted are absent (see [`ScanStats::skipped_pages`]).
    pub pages: Vec<PageScan>,

    /// Document metadata read from the PDF trailer.
    pub metadata: RosterMetadata,

    /// Page counts and stage timings.
    pub stats: ScanStats,
}

impl ScanOutput {
    /// Consume the output, keeping only the ID list.
    pub fn into_ids(self) -> Vec<String> {
        self.student_ids
    }
}

/// What the sift pass saw on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScan {
    /// Page number (1-indexed, as numbered by the PDF page tree).
    pub page_num: u32,

    /// Length of the extracted page text in characters.
    pub chars: usize,

    /// Whether the page text contained the course marker.
    pub matched: bool,

    /// Number of ID matches on this page (before cross-page dedup), zero for
    /// non-marker pages.
    pub ids_found: usize,
}

/// Document metadata from the PDF trailer `Info` dictionary.
///
/// Every field except `page_count` and `source` is optional; rosters exported
/// from the portal frequently carry none of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    /// Where the document came from: a URL, a file path, or `<memory>`.
    pub source: String,
}

/// Page counts and stage timings for one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages whose text contained the course marker.
    pub matched_pages: usize,
    /// Pages skipped because text extraction failed or yielded nothing.
    pub skipped_pages: usize,
    /// Distinct IDs in the final result.
    pub unique_ids: usize,
    /// Time spent resolving/downloading the input, in milliseconds.
    pub fetch_duration_ms: u64,
    /// Time spent parsing the PDF and extracting page text, in milliseconds.
    pub parse_duration_ms: u64,
    /// Wall-clock time for the whole scan, in milliseconds.
    pub total_duration_ms: u64,
}
