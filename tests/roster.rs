//! Integration tests for roster2teams.
//!
//! No network and no fixture files: roster PDFs are built in-process with
//! lopdf, and the HTTP paths (portal download, token endpoint) are exercised
//! against one-shot localhost servers.

use roster2teams::{
    inspect, scan, scan_from_bytes, scan_to_file, AuthConfig, RosterError, ScanConfig,
    TeamsNotifier,
};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const MARKER: &str = "ENGLISH WRITING SKILLS & COMMUNICATIONS";

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Build a PDF with one page per entry in `pages_text`.
fn build_pdf(pages_text: &[&str]) -> Vec<u8> {
    build_pdf_with_title(pages_text, None)
}

/// Same as [`build_pdf`], optionally attaching a trailer Info title.
fn build_pdf_with_title(pages_text: &[&str], title: Option<&str>) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages_text {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 780.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("in-memory save");
    buf
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Serve exactly one HTTP request on a random localhost port, then exit.
///
/// Reads the full request (headers + Content-Length body) before answering so
/// clients that expect the body to be consumed are not reset mid-write.
async fn one_shot_http(status: &'static str, content_type: &'static str, body: Vec<u8>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind localhost");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find_subslice(&request, b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..pos]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= pos + 4 + content_length {
                    break;
                }
            }
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.expect("write head");
        socket.write_all(&body).await.expect("write body");
        socket.shutdown().await.ok();
    });

    addr
}

fn local_config(addr: SocketAddr) -> ScanConfig {
    ScanConfig::builder()
        .base_url(format!("http://{addr}"))
        .build()
        .expect("valid config")
}

// ── Extraction ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_page_roster_yields_deduplicated_ids() {
    let pdf = build_pdf(&[
        "ENGLISH WRITING SKILLS & COMMUNICATIONS midterm roster: 19-00001-1, 19-00001-1, 20-99999-9",
    ]);

    let output = scan_from_bytes(&pdf, &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert_eq!(output.student_ids, vec!["19-00001-1", "20-99999-9"]);
    assert_eq!(output.stats.total_pages, 1);
    assert_eq!(output.stats.matched_pages, 1);
    assert_eq!(output.stats.unique_ids, 2);
}

#[tokio::test]
async fn roster_without_marker_yields_empty_set() {
    let pdf = build_pdf(&["INTRODUCTION TO PROGRAMMING roster: 21-12345-1, 22-54321-2"]);

    let output = scan_from_bytes(&pdf, &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert!(output.student_ids.is_empty());
    assert_eq!(output.stats.matched_pages, 0);
    // An empty result is still a successful scan, distinguishable from errors
    assert_eq!(output.stats.total_pages, 1);
}

#[tokio::test]
async fn duplicate_ids_across_pages_collapse() {
    let pdf = build_pdf(&[
        "ENGLISH WRITING SKILLS & COMMUNICATIONS section A: 19-00001-1",
        "ENGLISH WRITING SKILLS & COMMUNICATIONS section B: 19-00001-1 and 20-99999-9",
    ]);

    let output = scan_from_bytes(&pdf, &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert_eq!(output.student_ids, vec!["19-00001-1", "20-99999-9"]);
    assert_eq!(output.stats.total_pages, 2);
    assert_eq!(output.stats.matched_pages, 2);
}

#[tokio::test]
async fn ids_on_non_marker_pages_are_ignored() {
    let pdf = build_pdf(&[
        "SOME OTHER COURSE roster: 33-33333-3",
        "ENGLISH WRITING SKILLS & COMMUNICATIONS: ID 21-12345-1 attended",
    ]);

    let output = scan_from_bytes(&pdf, &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert_eq!(output.student_ids, vec!["21-12345-1"]);
}

#[tokio::test]
async fn malformed_id_shapes_are_never_matched() {
    let pdf = build_pdf(&[
        "ENGLISH WRITING SKILLS & COMMUNICATIONS: 1-1234-1, 21-123456-1, 21-12345-1",
    ]);

    let output = scan_from_bytes(&pdf, &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert_eq!(output.student_ids, vec!["21-12345-1"]);
}

#[tokio::test]
async fn non_pdf_bytes_are_a_typed_error_not_an_empty_result() {
    let err = scan_from_bytes(b"<html>portal maintenance page</html>", &ScanConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::NotAPdf { .. }));

    let err = scan_from_bytes(b"%PDF-1.5 but truncated garbage", &ScanConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::CorruptPdf { .. }));
}

#[tokio::test]
async fn scan_reads_local_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roster.pdf");
    std::fs::write(
        &path,
        build_pdf(&["ENGLISH WRITING SKILLS & COMMUNICATIONS: 20-11111-2"]),
    )
    .expect("write fixture");

    let output = scan(path.display().to_string(), &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert_eq!(output.student_ids, vec!["20-11111-2"]);
    assert_eq!(output.metadata.source, path.display().to_string());
}

#[tokio::test]
async fn scan_to_file_writes_sorted_ids_one_per_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pdf_path = dir.path().join("roster.pdf");
    std::fs::write(
        &pdf_path,
        build_pdf(&["ENGLISH WRITING SKILLS & COMMUNICATIONS: 20-99999-9 then 19-00001-1"]),
    )
    .expect("write fixture");
    let out_path = dir.path().join("ids.txt");

    let stats = scan_to_file(
        pdf_path.display().to_string(),
        &out_path,
        &ScanConfig::default(),
    )
    .await
    .expect("scan succeeds");

    assert_eq!(stats.unique_ids, 2);
    let written = std::fs::read_to_string(&out_path).expect("output exists");
    assert_eq!(written, "19-00001-1\n20-99999-9\n");
}

#[tokio::test]
async fn inspect_reads_metadata_without_credentials() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roster.pdf");
    std::fs::write(
        &path,
        build_pdf_with_title(
            &["ENGLISH WRITING SKILLS & COMMUNICATIONS: 21-12345-1", "second page"],
            Some("Mid Fall 24-25 Day 3 Slot 3"),
        ),
    )
    .expect("write fixture");

    let meta = inspect(path.display().to_string(), &ScanConfig::default())
        .await
        .expect("inspect succeeds");

    assert_eq!(meta.page_count, 2);
    assert_eq!(meta.title.as_deref(), Some("Mid Fall 24-25 Day 3 Slot 3"));
}

// ── Download ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn portal_relative_path_is_joined_and_downloaded() {
    let pdf = build_pdf(&["ENGLISH WRITING SKILLS & COMMUNICATIONS: 22-00042-7"]);
    let addr = one_shot_http("200 OK", "application/pdf", pdf).await;

    let output = scan("Files/Uploads/day-3-slot-3.pdf", &local_config(addr))
        .await
        .expect("scan succeeds");

    assert_eq!(output.student_ids, vec!["22-00042-7"]);
}

#[tokio::test]
async fn http_error_status_is_a_download_failure_not_a_crash() {
    let addr = one_shot_http("404 Not Found", "text/plain", Vec::new()).await;

    let err = scan("Files/Uploads/missing.pdf", &local_config(addr))
        .await
        .unwrap_err();

    match err {
        RosterError::DownloadFailed { reason, .. } => {
            assert!(reason.contains("404"), "got: {reason}");
        }
        other => panic!("expected DownloadFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_pdf_download_body_is_rejected() {
    let addr = one_shot_http("200 OK", "text/html", b"<html>login required</html>".to_vec()).await;

    let err = scan("Files/Uploads/roster.pdf", &local_config(addr))
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::NotAPdf { .. }));
}

// ── Notification ─────────────────────────────────────────────────────────────

fn local_auth(addr: SocketAddr) -> AuthConfig {
    AuthConfig {
        client_id: "test-client-id".into(),
        authority: format!("http://{addr}"),
        ..AuthConfig::default()
    }
}

#[tokio::test]
async fn successful_grant_reports_stubbed_delivery() {
    let addr = one_shot_http(
        "200 OK",
        "application/json",
        br#"{"token_type":"Bearer","expires_in":3599,"access_token":"test-token"}"#.to_vec(),
    )
    .await;

    let notifier = TeamsNotifier::new(local_auth(addr)).expect("configured");
    let receipt = notifier
        .notify("21-12345-1", "hunter2", "Midterm room changed to 423")
        .await
        .expect("grant succeeds");

    assert_eq!(receipt.recipient, "21-12345-1@student.aiub.edu");
    assert!(!receipt.delivered, "delivery is a stub and must say so");
}

#[tokio::test]
async fn rejected_grant_surfaces_the_provider_description() {
    let addr = one_shot_http(
        "400 Bad Request",
        "application/json",
        br#"{"error":"invalid_grant","error_description":"AADSTS50126: Error validating credentials due to invalid username or password."}"#.to_vec(),
    )
    .await;

    let notifier = TeamsNotifier::new(local_auth(addr)).expect("configured");
    let err = notifier
        .notify("21-12345-1", "wrong-password", "hello")
        .await
        .unwrap_err();

    match err {
        RosterError::AuthFailed { error, description } => {
            assert_eq!(error, "invalid_grant");
            assert!(description.contains("AADSTS50126"), "got: {description}");
        }
        other => panic!("expected AuthFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_still_fails_cleanly() {
    let addr = one_shot_http("500 Internal Server Error", "text/plain", b"boom".to_vec()).await;

    let notifier = TeamsNotifier::new(local_auth(addr)).expect("configured");
    let err = notifier.acquire_token("user@student.aiub.edu", "pw").await.unwrap_err();

    match err {
        RosterError::AuthFailed { error, .. } => assert_eq!(error, "http_500"),
        other => panic!("expected AuthFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn missing_client_id_fails_before_any_request() {
    let err = TeamsNotifier::new(AuthConfig::default()).err().unwrap();
    assert!(matches!(err, RosterError::AuthNotConfigured { .. }));
}
