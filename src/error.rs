//! Error types for the roster2teams library.
//!
//! A single fatal error enum covers the three failure boundaries of the
//! pipeline: fetching the roster, parsing the PDF, and authenticating against
//! the identity provider. Page-level extraction glitches are deliberately NOT
//! errors: a page that yields no text is skipped and counted in
//! [`crate::output::ScanStats::skipped_pages`], so one bad page never costs
//! the whole roster.
//!
//! The original tool collapsed every failure into an empty result, leaving
//! callers unable to tell "no IDs on this roster" from "the download broke".
//! Here each boundary returns a typed variant instead; the CLI is the one
//! place that flattens them back into a friendly message.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the roster2teams library.
#[derive(Debug, Error)]
pub enum RosterError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("roster PDF not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is empty or otherwise unusable.
    #[error("invalid input '{input}': not a file path, URL, or portal-relative path")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but the download failed.
    #[error("failed to download '{url}': {reason}\nCheck your internet connection and the portal path.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The bytes were fetched or read, but they are not a PDF.
    #[error("'{source_name}' is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { source_name: String, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("roster PDF '{source_name}' could not be parsed: {detail}")]
    CorruptPdf { source_name: String, detail: String },

    // ── Auth errors ───────────────────────────────────────────────────────
    /// No usable application client id was configured.
    #[error("Teams client application is not configured.\n{hint}")]
    AuthNotConfigured { hint: String },

    /// The token request never completed (DNS, TLS, connection reset).
    #[error("could not reach the identity provider: {reason}")]
    AuthTransport { reason: String },

    /// The identity provider rejected the credentials or the grant.
    ///
    /// `description` carries whatever `error_description` the provider
    /// returned, which is the only diagnostic an operator gets.
    #[error("authentication failed ({error}): {description}")]
    AuthFailed { error: String, description: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output ID list.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_failed_display() {
        let e = RosterError::DownloadFailed {
            url: "https://www.aiub.edu/Files/Uploads/roster.pdf".into(),
            reason: "HTTP 404 Not Found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("404"), "got: {msg}");
        assert!(msg.contains("roster.pdf"));
    }

    #[test]
    fn auth_failed_display() {
        let e = RosterError::AuthFailed {
            error: "invalid_grant".into(),
            description: "AADSTS50126: Error validating credentials".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("invalid_grant"));
        assert!(msg.contains("AADSTS50126"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = RosterError::NotAPdf {
            source_name: "roster.pdf".into(),
            magic: *b"<htm",
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }

    #[test]
    fn auth_not_configured_carries_hint() {
        let e = RosterError::AuthNotConfigured {
            hint: "Set TEAMS_CLIENT_ID or pass --client-id.".into(),
        };
        assert!(e.to_string().contains("TEAMS_CLIENT_ID"));
    }
}
