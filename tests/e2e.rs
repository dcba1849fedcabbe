//! End-to-end integration tests for mdpress.
//!
//! The conversion tests launch a real headless Chrome/Chromium instance and,
//! for diagram documents, fetch the diagram library from a CDN. They are
//! gated behind the `E2E_ENABLED` environment variable so they do not run in
//! CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! To restrict to a specific test:
//!   E2E_ENABLED=1 cargo test --test e2e plain_markdown -- --nocapture

use mdpress::{
    convert, convert_to_file, derive_output_path, ConversionConfig, MdpressError, StyleProfile,
};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

/// Write `markdown` into `dir` and return the path.
fn write_markdown(dir: &tempfile::TempDir, name: &str, markdown: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, markdown).expect("write test input");
    path
}

/// Config whose temp document lives inside `dir`, so a leaked temp file is
/// detectable and cannot collide with other tests.
fn config_in(dir: &tempfile::TempDir) -> ConversionConfig {
    ConversionConfig::builder()
        .temp_path(dir.path().join("temp.html"))
        .build()
        .expect("valid config")
}

/// Assert the bytes look like a PDF document.
fn assert_is_pdf(bytes: &[u8], context: &str) {
    assert!(
        bytes.len() > 1_000,
        "[{context}] PDF suspiciously small: {} bytes",
        bytes.len()
    );
    assert!(
        bytes.starts_with(b"%PDF-"),
        "[{context}] Output does not start with the PDF magic"
    );
    println!("[{context}] ✓  {} bytes, looks like a PDF", bytes.len());
}

// ── Pipeline tests (no browser, always run) ──────────────────────────────────

#[test]
fn missing_input_fails_before_launching_a_browser() {
    let dir = tempfile::tempdir().unwrap();
    let result = convert(dir.path().join("missing.md"), &config_in(&dir));
    assert!(matches!(result, Err(MdpressError::InputNotFound { .. })));
}

#[test]
fn output_path_derivation_matches_cli_default() {
    assert_eq!(
        derive_output_path("docs/report.md"),
        PathBuf::from("docs/report.pdf")
    );
}

// ── Conversion tests (need a Chrome/Chromium binary) ─────────────────────────

/// Plain prose, no diagrams: must succeed, produce a non-empty PDF, and
/// leave no temporary document behind.
#[test]
fn plain_markdown_converts_to_pdf() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = write_markdown(
        &dir,
        "notes.md",
        "# Notes\n\nSome *prose* with a [link](#notes).\n\n## Details\n\nMore text.\n",
    );
    let config = config_in(&dir);

    let output = convert(&input, &config).expect("conversion should succeed");

    assert_is_pdf(&output.pdf, "plain");
    assert_eq!(output.stats.heading_count, 2);
    assert_eq!(output.stats.diagram_count, 0);
    assert!(
        !config.temp_path.exists(),
        "temporary document was left behind at {}",
        config.temp_path.display()
    );
}

/// Diagram document: the capture must wait for the client-side renderer, so
/// the resulting PDF embeds the rendered diagram rather than its source.
/// Needs network access to fetch the diagram library.
#[test]
fn mermaid_document_converts_to_pdf() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = write_markdown(
        &dir,
        "flow.md",
        "# Flow\n\n```mermaid\ngraph TD;\n  A-->B;\n  B-->C;\n```\n",
    );
    let config = ConversionConfig::builder()
        .temp_path(dir.path().join("temp.html"))
        .diagram_timeout_secs(60)
        .build()
        .expect("valid config");

    let output = convert(&input, &config).expect("diagram conversion should succeed");

    assert_is_pdf(&output.pdf, "mermaid");
    assert_eq!(output.stats.diagram_count, 1);
    assert!(!config.temp_path.exists());
}

/// `convert_to_file` writes the PDF where asked and reports stats.
#[test]
fn convert_to_file_writes_the_artifact() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = write_markdown(&dir, "report.md", "# Report\n\nBody text.\n");
    let output_path = derive_output_path(&input);
    let config = config_in(&dir);

    let stats = convert_to_file(&input, &output_path, &config).expect("conversion should succeed");

    assert_eq!(output_path, dir.path().join("report.pdf"));
    let bytes = std::fs::read(&output_path).expect("output file should exist");
    assert_is_pdf(&bytes, "to_file");
    assert_eq!(stats.pdf_bytes, bytes.len());
    // No stray intermediate from the atomic write.
    assert!(!dir.path().join("report.pdf.tmp").exists());
}

/// A diagram container that never receives an SVG (no rendering script in
/// the document) must fail with a diagram timeout, not silently capture the
/// unrendered source — and the temporary document must still be cleaned up.
#[test]
fn unrenderable_diagram_times_out() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let config = ConversionConfig::builder()
        .temp_path(dir.path().join("temp.html"))
        .diagram_timeout_secs(2)
        .wait_for_settle(false)
        .build()
        .expect("valid config");

    // Hand-built document: a diagram container with no bootstrap script, so
    // the wait condition can never become true.
    let document = "<!DOCTYPE html>\n<html><body>\
<pre class=\"mermaid\">graph TD;\n  A--&gt;B;</pre>\
</body></html>\n";

    let result = mdpress::pipeline::capture::capture(document, &config);

    match result {
        Err(MdpressError::DiagramRenderTimeout {
            rendered,
            total,
            secs,
        }) => {
            assert_eq!(rendered, 0);
            assert_eq!(total, 1);
            assert_eq!(secs, 2);
        }
        other => panic!("expected a diagram timeout, got: {other:?}"),
    }
    assert!(
        !config.temp_path.exists(),
        "temporary document survived the failed capture"
    );
}

/// The minimal style profile still produces a valid artifact.
#[test]
fn minimal_style_profile_converts() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = write_markdown(&dir, "plain.md", "# Plain\n\ntext\n");
    let config = ConversionConfig::builder()
        .temp_path(dir.path().join("temp.html"))
        .style_profile(StyleProfile::Minimal)
        .build()
        .expect("valid config");

    let output = convert(&input, &config).expect("conversion should succeed");
    assert_is_pdf(&output.pdf, "minimal_style");
}
