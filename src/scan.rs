//! Scan entry points: resolve the input, extract page text, sift IDs.
//!
//! This is the eager, whole-document API. The pipeline is strictly
//! sequential (fetch, then parse, then sift) because the stages genuinely
//! depend on each other and a roster is a handful of pages; there is nothing
//! to overlap.

use crate::config::ScanConfig;
use crate::error::RosterError;
use crate::output::{RosterMetadata, ScanOutput, ScanStats};
use crate::pipeline::{input, pages, sift};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Scan a roster PDF for student IDs.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — local file path, HTTP/HTTPS URL, or portal-relative path
///   (joined to [`ScanConfig::base_url`])
/// * `config` — scan configuration
///
/// # Returns
/// `Ok(ScanOutput)` on success, even when no IDs were found or some pages
/// yielded no text (check `output.stats`).
///
/// # Errors
/// Returns `Err(RosterError)` only for fatal errors: the download failed, the
/// file is missing or unreadable, or the document is not parseable as a PDF.
pub async fn scan(
    input_str: impl AsRef<str>,
    config: &ScanConfig,
) -> Result<ScanOutput, RosterError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting roster scan: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let fetch_start = Instant::now();
    let resolved = input::resolve_input(input_str, config).await?;
    let pdf_path = resolved.path().to_path_buf();

    let bytes = tokio::fs::read(&pdf_path)
        .await
        .map_err(|e| RosterError::Internal(format!("failed to read resolved input: {e}")))?;
    let fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;

    let source_name = match &resolved {
        input::ResolvedInput::Local(p) => p.display().to_string(),
        input::ResolvedInput::Downloaded { .. } => input_str.to_string(),
    };

    scan_inner(bytes, &source_name, config, fetch_duration_ms, total_start).await
}

/// Scan roster PDF bytes already held in memory.
///
/// No temporary file is involved; the parser reads the buffer directly.
/// This is the recommended API when the PDF comes from a database or an
/// upload rather than the portal.
pub async fn scan_from_bytes(bytes: &[u8], config: &ScanConfig) -> Result<ScanOutput, RosterError> {
    let total_start = Instant::now();

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(RosterError::NotAPdf {
            source_name: "<memory>".to_string(),
            magic,
        });
    }

    scan_inner(bytes.to_vec(), "<memory>", config, 0, total_start).await
}

/// Shared tail of [`scan`] and [`scan_from_bytes`]: parse, sift, assemble.
async fn scan_inner(
    bytes: Vec<u8>,
    source_name: &str,
    config: &ScanConfig,
    fetch_duration_ms: u64,
    total_start: Instant,
) -> Result<ScanOutput, RosterError> {
    // ── Step 2: Extract per-page text ────────────────────────────────────
    let parse_start = Instant::now();
    let parsed = pages::parse_roster(bytes, source_name).await?;
    let parse_duration_ms = parse_start.elapsed().as_millis() as u64;
    info!(
        "Extracted text from {}/{} pages in {}ms",
        parsed.pages.len(),
        parsed.metadata.page_count,
        parse_duration_ms
    );

    // ── Step 3: Sift marker pages for IDs ────────────────────────────────
    let (ids, page_records) = sift::sift_pages(&parsed.pages, &config.course_marker);
    let matched_pages = page_records.iter().filter(|p| p.matched).count();
    debug!(
        "{} page(s) matched the course marker, {} distinct ID(s)",
        matched_pages,
        ids.len()
    );

    // ── Step 4: Assemble output ──────────────────────────────────────────
    let student_ids: Vec<String> = ids.into_iter().collect();
    let stats = ScanStats {
        total_pages: parsed.metadata.page_count,
        matched_pages,
        skipped_pages: parsed.skipped_pages,
        unique_ids: student_ids.len(),
        fetch_duration_ms,
        parse_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Scan complete: {} distinct ID(s) on {}/{} pages, {}ms total",
        stats.unique_ids, stats.matched_pages, stats.total_pages, stats.total_duration_ms
    );

    Ok(ScanOutput {
        student_ids,
        pages: page_records,
        metadata: parsed.metadata,
        stats,
    })
}

/// Scan a roster and write the ID list to a file, one ID per line.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn scan_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ScanConfig,
) -> Result<ScanStats, RosterError> {
    let output = scan(input_str, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RosterError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let mut body = output.student_ids.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, &body)
        .await
        .map_err(|e| RosterError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| RosterError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`scan`].
///
/// Creates a temporary tokio runtime internally.
pub fn scan_sync(
    input_str: impl AsRef<str>,
    config: &ScanConfig,
) -> Result<ScanOutput, RosterError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RosterError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(scan(input_str, config))
}

/// Read roster metadata without sifting for IDs.
///
/// Does not require Teams credentials.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ScanConfig,
) -> Result<RosterMetadata, RosterError> {
    let input_str = input_str.as_ref();
    let resolved = input::resolve_input(input_str, config).await?;

    let bytes = tokio::fs::read(resolved.path())
        .await
        .map_err(|e| RosterError::Internal(format!("failed to read resolved input: {e}")))?;

    let source_name = match &resolved {
        input::ResolvedInput::Local(p) => p.display().to_string(),
        input::ResolvedInput::Downloaded { .. } => input_str.to_string(),
    };

    let parsed = pages::parse_roster(bytes, &source_name).await?;
    Ok(parsed.metadata)
}
