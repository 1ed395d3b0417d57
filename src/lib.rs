//! # roster2teams
//!
//! Extract student IDs from university exam-roster PDFs and notify via
//! Microsoft Teams.
//!
//! ## Why this crate?
//!
//! Exam rosters are published on the university portal as multi-course PDFs.
//! Finding which of your students sit a particular slot means downloading the
//! PDF, hunting for the course's pages, and copying IDs out by hand. This
//! crate does the mechanical part: fetch the roster, keep only the pages for
//! the course of interest, and collect every distinct student ID on them.
//!
//! ## Pipeline Overview
//!
//! ```text
//! roster
//!  │
//!  ├─ 1. Input   resolve local file, URL, or portal-relative path
//!  ├─ 2. Pages   extract plain text per page via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 3. Sift    keep marker pages, scan for NN-NNNNN-N, dedup
//!  └─ 4. Notify  username/password OAuth grant + stubbed Teams send
//! ```
//!
//! Steps run strictly in sequence; a roster is a handful of pages and there
//! is nothing worth overlapping.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster2teams::{scan, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::default();
//!     let output = scan("Files/Uploads/day-3-slot-3-mid_fall-24-25.pdf", &config).await?;
//!     println!("Found {} student IDs: {:?}",
//!         output.stats.unique_ids,
//!         output.student_ids);
//!     Ok(())
//! }
//! ```
//!
//! ## Notification is half-built, on purpose
//!
//! [`TeamsNotifier::notify`] authenticates for real (one OAuth
//! username/password grant, no refresh, no retry) but does NOT call the
//! Microsoft Graph chat API. It logs the would-be message and returns a
//! [`NotifyReceipt`] with `delivered: false`. Wire up a real Graph client
//! before trusting this tool to deliver anything.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `roster2teams` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! roster2teams = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    AuthConfig, ScanConfig, ScanConfigBuilder, DEFAULT_AUTHORITY, DEFAULT_BASE_URL,
    DEFAULT_COURSE_MARKER, DEFAULT_EMAIL_DOMAIN, DEFAULT_ROSTER_PATH, DEFAULT_SCOPES,
};
pub use error::RosterError;
pub use notify::{NotifyReceipt, TeamsNotifier, TokenResponse};
pub use output::{PageScan, RosterMetadata, ScanOutput, ScanStats};
pub use pipeline::sift::STUDENT_ID_PATTERN;
pub use scan::{inspect, scan, scan_from_bytes, scan_sync, scan_to_file};
