//! Per-page text extraction via lopdf.
//!
//! ## Why spawn_blocking?
//!
//! Parsing a PDF and decoding its content streams is CPU-bound.
//! `tokio::task::spawn_blocking` moves the work onto the blocking thread pool
//! so the async caller (which may be mid-download on the same runtime) is not
//! stalled.
//!
//! ## Failure semantics
//!
//! A document that cannot be parsed at all is a [`RosterError::CorruptPdf`].
//! A single page whose text cannot be extracted (scanned image pages,
//! missing font resources) is skipped with a warning and counted, never
//! fatal: rosters routinely mix text pages with scanned cover sheets, and one
//! bad page must not cost the rest of the document.

use crate::error::RosterError;
use crate::output::RosterMetadata;
use lopdf::Document;
use tracing::{debug, warn};

/// One page's extracted plain text.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-indexed, as numbered by the PDF page tree).
    pub page_num: u32,
    pub text: String,
}

/// A parsed roster: trailer metadata plus per-page text.
#[derive(Debug)]
pub struct ParsedRoster {
    pub metadata: RosterMetadata,
    /// Pages that yielded text, in document order.
    pub pages: Vec<PageText>,
    /// Pages that yielded no text (extraction error or blank).
    pub skipped_pages: usize,
}

/// Parse PDF bytes and extract plain text for every page.
///
/// `source_name` labels errors and metadata: a URL, a file path, or
/// `<memory>`.
pub async fn parse_roster(bytes: Vec<u8>, source_name: &str) -> Result<ParsedRoster, RosterError> {
    let source = source_name.to_string();

    tokio::task::spawn_blocking(move || parse_roster_blocking(&bytes, &source))
        .await
        .map_err(|e| RosterError::Internal(format!("parse task panicked: {e}")))?
}

/// Blocking implementation of roster parsing.
fn parse_roster_blocking(bytes: &[u8], source_name: &str) -> Result<ParsedRoster, RosterError> {
    let doc = Document::load_mem(bytes).map_err(|e| RosterError::CorruptPdf {
        source_name: source_name.to_string(),
        detail: e.to_string(),
    })?;

    let page_map = doc.get_pages();
    let total_pages = page_map.len();
    debug!("Roster PDF loaded: {} pages", total_pages);

    let mut pages = Vec::with_capacity(total_pages);
    let mut skipped = 0usize;

    for (page_num, _page_id) in page_map {
        match doc.extract_text(&[page_num]) {
            Ok(text) if !text.trim().is_empty() => {
                pages.push(PageText { page_num, text });
            }
            Ok(_) => {
                warn!("Page {}: no extractable text, skipping", page_num);
                skipped += 1;
            }
            Err(e) => {
                warn!("Page {}: text extraction failed ({}), skipping", page_num, e);
                skipped += 1;
            }
        }
    }

    let mut metadata = extract_metadata(&doc);
    metadata.page_count = total_pages;
    metadata.source = source_name.to_string();

    Ok(ParsedRoster {
        metadata,
        pages,
        skipped_pages: skipped,
    })
}

/// Read the trailer `Info` dictionary into [`RosterMetadata`].
///
/// Every lookup is best-effort: rosters exported from the portal often carry
/// no Info dictionary at all.
fn extract_metadata(doc: &Document) -> RosterMetadata {
    let mut metadata = RosterMetadata::default();

    let info_dict = doc
        .trailer
        .get(b"Info")
        .and_then(|obj| obj.as_reference())
        .and_then(|id| doc.get_object(id))
        .and_then(|obj| obj.as_dict());

    if let Ok(dict) = info_dict {
        let get_str = |key: &[u8]| -> Option<String> {
            dict.get(key)
                .and_then(|v| v.as_str())
                .ok()
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty())
        };

        metadata.title = get_str(b"Title");
        metadata.author = get_str(b"Author");
        metadata.subject = get_str(b"Subject");
        metadata.creator = get_str(b"Creator");
        metadata.producer = get_str(b"Producer");
    }

    metadata
}
