//! Configuration types for roster scanning and Teams notification.
//!
//! All scan behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. Keeping every knob in one struct makes it trivial to
//! share configs across calls, serialise them for logging, and diff two runs
//! to understand why their outputs differ.
//!
//! The portal constants below are the defaults the tool ships with; every one
//! of them is overridable through the builder (or the CLI's flags and env
//! vars) rather than being baked into the pipeline.

use crate::error::RosterError;
use serde::{Deserialize, Serialize};

/// Default portal origin the roster PDF is fetched from.
pub const DEFAULT_BASE_URL: &str = "https://www.aiub.edu";

/// Portal-relative path of the roster this tool was built around.
pub const DEFAULT_ROSTER_PATH: &str = "Files/Uploads/day-3-slot-3-mid_fall-24-25.pdf";

/// Course-name marker selecting the relevant roster pages.
///
/// Matching is case-insensitive substring containment on the page text.
pub const DEFAULT_COURSE_MARKER: &str = "ENGLISH WRITING SKILLS & COMMUNICATIONS";

/// Identity-provider authority for the username/password token grant.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common";

/// Permission scopes requested with the token.
pub const DEFAULT_SCOPES: [&str; 2] = ["User.Read", "Chat.ReadWrite"];

/// Domain suffix appended to the operator's email local part.
pub const DEFAULT_EMAIL_DOMAIN: &str = "student.aiub.edu";

/// Configuration for a roster scan.
///
/// Built via [`ScanConfig::builder()`] or using [`ScanConfig::default()`].
///
/// # Example
/// ```rust
/// use roster2teams::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .base_url("https://portal.example.edu")
///     .course_marker("ENGLISH WRITING SKILLS & COMMUNICATIONS")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Portal origin that portal-relative inputs are joined to.
    /// Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Case-insensitive course marker a page must contain to be scanned for
    /// IDs. Default: [`DEFAULT_COURSE_MARKER`].
    pub course_marker: String,

    /// Download timeout for URL inputs in seconds. Default: 120.
    ///
    /// This is the only network policy applied; there is no retry and no
    /// redirect handling beyond the HTTP client's defaults.
    pub download_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            course_marker: DEFAULT_COURSE_MARKER.to_string(),
            download_timeout_secs: 120,
        }
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn course_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.course_marker = marker.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, RosterError> {
        let c = &self.config;
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(RosterError::InvalidConfig(format!(
                "base_url must be an http(s) origin, got '{}'",
                c.base_url
            )));
        }
        if c.course_marker.trim().is_empty() {
            return Err(RosterError::InvalidConfig(
                "course_marker must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Identity-provider settings for [`crate::notify::TeamsNotifier`].
///
/// The defaults mirror what the tool ships with: a fixed authority, the two
/// Teams scopes, the student email domain, and an EMPTY client id. The tool
/// is non-functional for authentication until an application client id is
/// injected (flag, env var, or this struct), which is intentional: the id is
/// deployment configuration, not code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Registered application (client) id. Empty by default.
    pub client_id: String,

    /// Authority URL the token request is posted to (under
    /// `/oauth2/v2.0/token`). Default: [`DEFAULT_AUTHORITY`].
    ///
    /// Note the `/common` authority is kept for compatibility with the
    /// original deployment; tenanted setups should inject
    /// `https://login.microsoftonline.com/<tenant>` instead.
    pub authority: String,

    /// Permission scopes requested with the token.
    pub scopes: Vec<String>,

    /// Domain appended to the operator's email local part.
    pub email_domain: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            authority: DEFAULT_AUTHORITY.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
        }
    }
}
