//! CLI binary for roster2teams.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig` /
//! `AuthConfig`, prompts for whatever the flags didn't supply, and prints
//! results.
//!
//! Failure handling follows the tool's availability-first tradition: a failed
//! download, parse, or authentication is logged and reported as a friendly
//! line, then the process falls through to normal termination. The library
//! returns typed errors; this binary is where they become prose.

use anyhow::{Context, Result};
use clap::Parser;
use roster2teams::{
    inspect, scan, AuthConfig, RosterError, ScanConfig, ScanOutput, TeamsNotifier,
    DEFAULT_AUTHORITY, DEFAULT_BASE_URL, DEFAULT_COURSE_MARKER, DEFAULT_EMAIL_DOMAIN,
    DEFAULT_ROSTER_PATH,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan the default mid-term roster on the portal
  roster2teams

  # Scan a specific portal document
  roster2teams Files/Uploads/day-1-slot-2-final_fall-24-25.pdf

  # Scan a local file or a full URL
  roster2teams ./roster.pdf
  roster2teams https://www.aiub.edu/Files/Uploads/roster.pdf

  # Write the ID list to a file, skip the Teams step
  roster2teams --no-notify -o ids.txt

  # Machine-readable output (implies no Teams step)
  roster2teams --json > scan.json

  # Roster metadata only
  roster2teams --inspect-only

  # Non-interactive notification (password is still prompted)
  roster2teams --email jane.doe --message "Midterm room changed to 423"

NOTE ON DELIVERY:
  The Teams send is a stub. On successful sign-in the tool logs the message
  it WOULD send and reports delivered=false. No Graph API call is made.

ENVIRONMENT VARIABLES:
  ROSTER_BASE_URL        Portal origin (default: https://www.aiub.edu)
  ROSTER_COURSE_MARKER   Course marker selecting roster pages
  TEAMS_CLIENT_ID        Registered application client id (required to sign in)
  TEAMS_AUTHORITY        Identity-provider authority URL
  TEAMS_EMAIL_DOMAIN     Domain appended to the email local part
  TEAMS_EMAIL            Email local part (skips the prompt)
"#;

/// Extract student IDs from exam-roster PDFs and notify via Microsoft Teams.
#[derive(Parser, Debug)]
#[command(
    name = "roster2teams",
    version,
    about = "Extract student IDs from exam-roster PDFs and notify via Microsoft Teams",
    long_about = "Download an exam-roster PDF from the university portal (or read a local \
file/URL), collect the distinct student IDs on the pages of one course, and sign in to \
Microsoft Teams to report the message that would be sent. Message delivery itself is a stub.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Portal-relative path, local file path, or HTTP/HTTPS URL of the roster.
    #[arg(default_value = DEFAULT_ROSTER_PATH)]
    input: String,

    /// Write the ID list to this file (one ID per line) instead of only printing.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Portal origin that relative inputs are joined to.
    #[arg(long, env = "ROSTER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Course marker a page must contain (case-insensitive) to be scanned.
    #[arg(long, env = "ROSTER_COURSE_MARKER", default_value = DEFAULT_COURSE_MARKER)]
    marker: String,

    /// Registered application client id for the Teams sign-in.
    #[arg(long, env = "TEAMS_CLIENT_ID", default_value = "")]
    client_id: String,

    /// Identity-provider authority URL.
    #[arg(long, env = "TEAMS_AUTHORITY", default_value = DEFAULT_AUTHORITY)]
    authority: String,

    /// Domain appended to the email local part.
    #[arg(long, env = "TEAMS_EMAIL_DOMAIN", default_value = DEFAULT_EMAIL_DOMAIN)]
    email_domain: String,

    /// Teams email local part (prompted for when omitted).
    #[arg(long, env = "TEAMS_EMAIL")]
    email: Option<String>,

    /// Message text (prompted for when omitted).
    #[arg(long)]
    message: Option<String>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "ROSTER_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output the full scan result as JSON (skips the Teams step).
    #[arg(long)]
    json: bool,

    /// Print roster metadata only, no scan.
    #[arg(long)]
    inspect_only: bool,

    /// Scan only; never prompt for credentials or sign in.
    #[arg(long)]
    no_notify: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the final result.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = ScanConfig::builder()
        .base_url(cli.base_url.clone())
        .course_marker(cli.marker.clone())
        .download_timeout_secs(cli.download_timeout)
        .build()
        .context("Invalid configuration")?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = match inspect(&cli.input, &config).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::error!("Error inspecting roster PDF: {e}");
                println!("Failed to read roster PDF");
                return Ok(());
            }
        };

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("Source:       {}", meta.source);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Scan ─────────────────────────────────────────────────────────────
    let output = match scan(&cli.input, &config).await {
        Ok(output) => output,
        Err(e) => {
            // Download/parse failures end the run with a friendly line, not
            // a crash; the typed detail already went to the log.
            tracing::error!("Error scanning roster PDF: {e}");
            println!("{}", red("Failed to download or parse the roster PDF"));
            return Ok(());
        }
    };

    if let Some(ref output_path) = cli.output {
        if let Err(e) = write_ids_file(&output, output_path).await {
            tracing::error!("Error writing ID list: {e}");
            println!("{}", red(&format!("Failed to write {}", output_path.display())));
            return Ok(());
        }
        if !cli.quiet {
            eprintln!(
                "{}  {} ID(s)  →  {}",
                green("✔"),
                output.stats.unique_ids,
                bold(&output_path.display().to_string()),
            );
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if output.student_ids.is_empty() {
        println!("No student IDs found");
        return Ok(());
    }

    println!(
        "Found {} student IDs: {}",
        bold(&output.stats.unique_ids.to_string()),
        output.student_ids.join(", ")
    );
    if !cli.quiet {
        eprintln!(
            "   {}",
            dim(&format!(
                "{} page(s) matched of {} ({} skipped), {}ms",
                output.stats.matched_pages,
                output.stats.total_pages,
                output.stats.skipped_pages,
                output.stats.total_duration_ms
            ))
        );
    }

    if cli.no_notify {
        return Ok(());
    }

    // ── Notify (operator credentials, single message) ────────────────────
    // The message goes out once, addressed to the operator's own account,
    // not per extracted student. The ID list above is the scan deliverable.
    let auth = AuthConfig {
        client_id: cli.client_id.clone(),
        authority: cli.authority.clone(),
        email_domain: cli.email_domain.clone(),
        ..AuthConfig::default()
    };

    let notifier = match TeamsNotifier::new(auth) {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("{e}");
            println!("{}", red("Teams sign-in is not configured; skipping notification"));
            return Ok(());
        }
    };

    let email = match cli.email {
        Some(ref e) if !e.trim().is_empty() => e.trim().to_string(),
        _ => prompt(&format!(
            "Enter your Microsoft Teams email (without @{}): ",
            cli.email_domain
        ))?,
    };
    let password = prompt("Enter your Microsoft Teams password: ")?;
    let message = match cli.message {
        Some(ref m) if !m.is_empty() => m.clone(),
        _ => prompt("Enter the message to send: ")?,
    };

    match notifier.notify(&email, &password, &message).await {
        Ok(receipt) => {
            println!(
                "{} Signed in as {}",
                green("✔"),
                bold(&receipt.recipient)
            );
            println!(
                "{}",
                dim("Message delivery is not implemented; the message above was logged, not sent.")
            );
        }
        Err(RosterError::AuthFailed { error, description }) => {
            tracing::error!("Authentication failed. Please check your username and password.");
            tracing::error!("Error: {description}");
            println!("{} ({error})", red("Authentication failed"));
        }
        Err(e) => {
            tracing::error!("Error during Teams sign-in: {e}");
            println!("{}", red("Could not reach the identity provider"));
        }
    }

    Ok(())
}

/// Write the ID list one-per-line next to whatever the scan already printed.
async fn write_ids_file(output: &ScanOutput, path: &PathBuf) -> Result<(), RosterError> {
    let mut body = output.student_ids.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    tokio::fs::write(path, body)
        .await
        .map_err(|e| RosterError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })
}

/// Print a prompt on stdout and read one trimmed line from stdin.
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(line.trim().to_string())
}
