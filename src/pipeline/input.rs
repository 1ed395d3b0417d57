//! Input resolution: normalise a user-supplied path, URL, or portal-relative
//! path to a local PDF file.
//!
//! Three input shapes are accepted, tried in this order:
//!
//! 1. `http://` / `https://` — downloaded as-is.
//! 2. An existing local file — used in place.
//! 3. Anything else — treated as a path relative to the portal origin
//!    (`ScanConfig::base_url`), joined and downloaded.
//!
//! Downloads land in a `TempDir` that is kept alive inside [`ResolvedInput`],
//! so cleanup happens automatically when the value is dropped, even if the
//! process panics mid-scan. We validate the PDF magic bytes (`%PDF`) before
//! returning so callers get a meaningful error rather than a parser failure
//! deep inside the page loop.

use crate::config::ScanConfig;
use crate::error::RosterError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input: either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL (or portal-relative path); PDF downloaded to a temp
    /// directory. The `TempDir` is kept alive to prevent cleanup until
    /// processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Join a portal-relative path to the portal origin.
///
/// Slash-normalising: any combination of trailing slash on the base and
/// leading slash on the path produces exactly one separator.
pub fn join_portal_url(base_url: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Resolve the input string to a local PDF file path.
pub async fn resolve_input(input: &str, config: &ScanConfig) -> Result<ResolvedInput, RosterError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RosterError::InvalidInput {
            input: input.to_string(),
        });
    }

    if is_url(input) {
        return download_url(input, config.download_timeout_secs).await;
    }

    let path = PathBuf::from(input);
    if path.exists() {
        return resolve_local(path);
    }

    // Not a URL, not a file on disk: assume it names a document on the portal.
    let url = join_portal_url(&config.base_url, input);
    download_url(&url, config.download_timeout_secs).await
}

/// Resolve a local file path, validating readability and PDF magic bytes.
fn resolve_local(path: PathBuf) -> Result<ResolvedInput, RosterError> {
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(RosterError::NotAPdf {
                    source_name: path.display().to_string(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(RosterError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(RosterError::FileNotFound { path });
        }
    }

    debug!("Resolved local roster PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, RosterError> {
    info!("Downloading roster PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RosterError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            RosterError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            RosterError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(RosterError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = extract_filename(url);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RosterError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    // Verify PDF magic bytes before touching the filesystem.
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(RosterError::NotAPdf {
            source_name: url.to_string(),
            magic,
        });
    }

    let temp_dir = TempDir::new().map_err(|e| RosterError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| RosterError::Internal(format!("failed to write temp file: {e}")))?;

    info!("Roster PDF downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Some(last) = url.split('/').next_back() {
        let last = last.split(['?', '#']).next().unwrap_or("");
        if !last.is_empty() && last.contains('.') {
            return last.to_string();
        }
    }

    "roster.pdf".to_string()
}
