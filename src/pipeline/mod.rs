//! Pipeline stages for roster scanning.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. switch the PDF backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pages ──▶ sift
//! (URL/path) (per-page text) (marker filter + ID scan)
//! ```
//!
//! 1. [`input`] — canonicalise the user-supplied path, URL, or portal-relative
//!    path to local PDF bytes
//! 2. [`pages`] — extract plain text per page; runs in `spawn_blocking`
//!    because PDF parsing is CPU-bound
//! 3. [`sift`]  — filter pages by the course marker and collect distinct
//!    student IDs
//!
//! Notification is not a pipeline stage; it runs once, after the scan, and
//! only when the orchestrator decides to (see [`crate::notify`]).

pub mod input;
pub mod pages;
pub mod sift;
