//! Conversion entry points.
//!
//! The pipeline is a single sequential pass — parse, assemble, capture — so
//! the entry points here are thin: they add file I/O at both ends, timing,
//! and logging around the three stages in [`crate::pipeline`].

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::error::MdpressError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{assemble, capture, transform};

/// Convert a Markdown file to PDF bytes.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Every error is fatal to the invocation: unreadable input, a missing
/// rendering engine, diagrams that never finish, or a failed capture. The
/// temporary HTML document is cleaned up on all paths.
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, MdpressError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Step 1: Read input ───────────────────────────────────────────────
    let markdown = read_input(input_path)?;
    debug!("Read {} bytes of Markdown", markdown.len());

    // ── Step 2: Transform and assemble ───────────────────────────────────
    let transform_start = Instant::now();
    let transformed = transform::transform(&markdown, config.markdown_profile);
    let document = assemble::assemble(&transformed.html, config.style_profile);
    let transform_duration_ms = transform_start.elapsed().as_millis() as u64;
    debug!(
        "Transformed: {} headings, {} diagrams",
        transformed.anchor_ids.len(),
        transformed.diagram_count
    );

    // ── Step 3: Render and capture ───────────────────────────────────────
    let render_start = Instant::now();
    let pdf = capture::capture(&document, config)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!("Rendered PDF in {render_duration_ms}ms");

    let stats = ConversionStats {
        heading_count: transformed.anchor_ids.len(),
        diagram_count: transformed.diagram_count,
        pdf_bytes: pdf.len(),
        transform_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} bytes, {}ms total",
        stats.pdf_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput { pdf, stats })
}

/// Convert a Markdown file and write the PDF next to the requested path.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, MdpressError> {
    let output = convert(input_path, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| MdpressError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &output.pdf).map_err(|e| MdpressError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| MdpressError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("Wrote {} ({} bytes)", path.display(), output.stats.pdf_bytes);
    Ok(output.stats)
}

/// Default output path for an input: same location, `.pdf` extension.
///
/// `docs/report.md` becomes `docs/report.pdf`. Only a trailing `.md` or
/// `.markdown` is substituted; any other name gets `.pdf` appended rather
/// than losing part of itself.
pub fn derive_output_path(input_path: impl AsRef<Path>) -> PathBuf {
    let input_path = input_path.as_ref();
    let is_markdown = input_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"));
    if is_markdown {
        input_path.with_extension("pdf")
    } else {
        let mut os = input_path.as_os_str().to_os_string();
        os.push(".pdf");
        PathBuf::from(os)
    }
}

/// Read the Markdown source, mapping I/O failures to actionable errors.
fn read_input(path: &Path) -> Result<String, MdpressError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MdpressError::InputNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => MdpressError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => MdpressError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
