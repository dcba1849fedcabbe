//! PDF capture: drive a headless Chrome instance over the assembled document.
//!
//! ## Why poll the DOM before printing?
//!
//! The printed PDF is a point-in-time snapshot of the DOM. Diagram rendering
//! happens *after* load, asynchronously, inside the page: the bootstrap
//! script finds every `.mermaid` container and replaces its source text with
//! an SVG. Printing before that completes captures diagram source (or an
//! empty box) instead of a diagram. The capture stage therefore polls the
//! page until every container has an `svg` child, under an explicit timeout,
//! and only then invokes the paginated print.
//!
//! ## Resource ownership
//!
//! The temporary document and the browser process are both scoped to this
//! one call. The temp file is held by a drop guard so deletion runs on every
//! exit path — a failed capture does not leave `temp.html` behind — and a
//! deletion failure is logged, never allowed to mask the capture outcome.
//! The browser process is torn down when [`Browser`] drops.

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, Tab};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::{ConversionConfig, PageFormat};
use crate::error::MdpressError;

/// CSS reference pixel density used to convert measured page height.
const CSS_PX_PER_INCH: f64 = 96.0;

/// Interval between DOM polls while waiting for diagrams or settle state.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Ceiling on the best-effort settle wait (load state + web fonts).
const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

const JS_DIAGRAM_TOTAL: &str = "document.querySelectorAll('.mermaid').length";
const JS_DIAGRAM_RENDERED: &str = "document.querySelectorAll('.mermaid > svg').length";
const JS_SETTLED: &str =
    "document.readyState === 'complete' && (!document.fonts || document.fonts.status !== 'loading')";
const JS_CONTENT_HEIGHT: &str = "document.documentElement.scrollHeight";

/// Render the assembled document and return the captured PDF bytes.
///
/// Strictly ordered: persist to `config.temp_path`, launch the engine,
/// navigate, wait for diagrams (and optionally for the page to settle),
/// print. Cleanup of the temp file and the engine instance is guaranteed on
/// success and failure alike.
pub fn capture(document: &str, config: &ConversionConfig) -> Result<Vec<u8>, MdpressError> {
    let temp = TempDoc::persist(&config.temp_path, document)?;

    let browser = Browser::default().map_err(|e| MdpressError::EngineLaunchFailed {
        detail: e.to_string(),
    })?;
    let tab = browser.new_tab().map_err(|e| MdpressError::EngineLaunchFailed {
        detail: e.to_string(),
    })?;

    let url = temp.file_url()?;
    debug!("Loading document: {url}");
    tab.navigate_to(&url)
        .map_err(|e| MdpressError::NavigationFailed {
            url: url.clone(),
            detail: e.to_string(),
        })?;
    tab.wait_until_navigated()
        .map_err(|e| MdpressError::NavigationFailed {
            url: url.clone(),
            detail: e.to_string(),
        })?;

    wait_for_diagrams(&tab, Duration::from_secs(config.diagram_timeout_secs))?;

    if config.wait_for_settle {
        wait_for_settle(&tab)?;
    }

    let options = print_options(&tab, config)?;
    let bytes = tab
        .print_to_pdf(Some(options))
        .map_err(|e| MdpressError::CaptureFailed {
            detail: e.to_string(),
        })?;
    debug!("Captured {} PDF bytes", bytes.len());
    Ok(bytes)
}

// ── Wait conditions ──────────────────────────────────────────────────────

/// Block until every diagram container holds a rendered SVG.
///
/// A document with no containers settles immediately. On expiry the error
/// carries how far rendering got, which distinguishes "library never loaded"
/// (0 of n) from "one malformed diagram" (n-1 of n).
fn wait_for_diagrams(tab: &Tab, timeout: Duration) -> Result<(), MdpressError> {
    let deadline = Instant::now() + timeout;
    loop {
        let total = eval_count(tab, JS_DIAGRAM_TOTAL)?;
        if total == 0 {
            debug!("No diagram containers in document");
            return Ok(());
        }
        let rendered = eval_count(tab, JS_DIAGRAM_RENDERED)?;
        if rendered >= total {
            debug!("All {total} diagrams rendered");
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(MdpressError::DiagramRenderTimeout {
                rendered,
                total,
                secs: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Best-effort wait for load state and web fonts to settle.
///
/// Expiry is a warning, not an error: a page that never reports itself
/// settled is still capturable, just possibly before late resources paint.
fn wait_for_settle(tab: &Tab) -> Result<(), MdpressError> {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    loop {
        if eval_bool(tab, JS_SETTLED)? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            warn!(
                "Document did not settle within {}s; capturing anyway",
                SETTLE_TIMEOUT.as_secs()
            );
            return Ok(());
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

// ── Print invocation ─────────────────────────────────────────────────────

/// Build the paginated-print options from the config, measuring content
/// height from the live page for the single-page format.
fn print_options(
    tab: &Tab,
    config: &ConversionConfig,
) -> Result<PrintToPdfOptions, MdpressError> {
    let (margin_top, margin_right, margin_bottom, margin_left) = config.margins.to_inches()?;

    let (paper_width, paper_height) = match config.page_format {
        PageFormat::SinglePage { width_in } => {
            let content_px = eval_f64(tab, JS_CONTENT_HEIGHT)?;
            let height_in = content_px / CSS_PX_PER_INCH + margin_top + margin_bottom;
            debug!("Content height {content_px}px → {height_in:.2}in page");
            (width_in, height_in)
        }
        format => format
            .dimensions_in()
            .ok_or_else(|| MdpressError::Internal("page format without dimensions".into()))?,
    };

    Ok(PrintToPdfOptions {
        landscape: Some(false),
        print_background: Some(true),
        generate_tagged_pdf: Some(true),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(margin_top),
        margin_right: Some(margin_right),
        margin_bottom: Some(margin_bottom),
        margin_left: Some(margin_left),
        prefer_css_page_size: Some(false),
        ..Default::default()
    })
}

// ── Script evaluation helpers ────────────────────────────────────────────

fn eval_value(tab: &Tab, expression: &str) -> Result<serde_json::Value, MdpressError> {
    let object = tab
        .evaluate(expression, false)
        .map_err(|e| MdpressError::ScriptFailed {
            detail: e.to_string(),
        })?;
    object.value.ok_or_else(|| MdpressError::ScriptFailed {
        detail: format!("expression produced no value: {expression}"),
    })
}

fn eval_bool(tab: &Tab, expression: &str) -> Result<bool, MdpressError> {
    match eval_value(tab, expression)? {
        serde_json::Value::Bool(b) => Ok(b),
        other => Err(MdpressError::ScriptFailed {
            detail: format!("expected a boolean, got {other}: {expression}"),
        }),
    }
}

fn eval_f64(tab: &Tab, expression: &str) -> Result<f64, MdpressError> {
    eval_value(tab, expression)?
        .as_f64()
        .ok_or_else(|| MdpressError::ScriptFailed {
            detail: format!("expected a number: {expression}"),
        })
}

fn eval_count(tab: &Tab, expression: &str) -> Result<usize, MdpressError> {
    Ok(eval_f64(tab, expression)? as usize)
}

// ── Temp document guard ──────────────────────────────────────────────────

/// The persisted document, deleted when the guard drops.
struct TempDoc {
    path: PathBuf,
}

impl TempDoc {
    /// Write the document to `path` and take ownership of the file.
    fn persist(path: &Path, contents: &str) -> Result<Self, MdpressError> {
        std::fs::write(path, contents).map_err(|e| MdpressError::TempWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Persisted assembled document to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// `file://` URL for the persisted document.
    ///
    /// Built through [`url::Url`] so reserved characters in the path (`#`,
    /// `?`, spaces) are percent-encoded instead of truncating the URL.
    fn file_url(&self) -> Result<String, MdpressError> {
        let absolute =
            std::fs::canonicalize(&self.path).map_err(|e| MdpressError::TempWriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        let url = url::Url::from_file_path(&absolute).map_err(|()| {
            MdpressError::Internal(format!(
                "temp path '{}' cannot be expressed as a file URL",
                absolute.display()
            ))
        })?;
        Ok(url.into())
    }
}

impl Drop for TempDoc {
    fn drop(&mut self) {
        // Cleanup failure is non-fatal: log it, never mask the capture outcome.
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(
                "Failed to delete temporary document '{}': {e}",
                self.path.display()
            );
        } else {
            debug!("Deleted temporary document {}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Margins;

    #[test]
    fn temp_doc_is_deleted_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.html");
        {
            let _guard = TempDoc::persist(&path, "<html></html>").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn temp_doc_builds_absolute_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.html");
        let guard = TempDoc::persist(&path, "x").unwrap();
        let url = guard.file_url().unwrap();
        assert!(url.starts_with("file:///"), "got: {url}");
        assert!(url.ends_with("doc.html"), "got: {url}");
    }

    #[test]
    fn temp_doc_url_percent_encodes_reserved_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc #1?.html");
        let guard = TempDoc::persist(&path, "x").unwrap();
        let url = guard.file_url().unwrap();
        // A raw '#' would truncate the URL at the fragment; '?' would start
        // a query string.
        assert!(!url.contains('#'), "got: {url}");
        assert!(!url.contains('?'), "got: {url}");
        assert!(url.contains("%23"), "got: {url}");
        assert!(url.contains("%3F"), "got: {url}");
    }

    #[test]
    fn temp_doc_write_failure_is_reported() {
        let err = TempDoc::persist(Path::new("/nonexistent-dir/doc.html"), "x");
        assert!(matches!(err, Err(MdpressError::TempWriteFailed { .. })));
    }

    #[test]
    fn margins_resolve_before_measuring_height() {
        // print_options needs a live tab for SinglePage; the margin maths it
        // relies on is covered here without one.
        let m = Margins::uniform_cm(2.0);
        let (top, right, bottom, left) = m.to_inches().unwrap();
        for side in [top, right, bottom, left] {
            assert!((side - 2.0 / 2.54).abs() < 1e-9);
        }
    }
}
