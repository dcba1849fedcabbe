//! Error types for the mdpress library.
//!
//! One enum covers the whole pipeline because a conversion is a single
//! sequential pass: every failure is fatal to the invocation that raised it.
//! The only deliberately non-fatal condition — failing to delete the
//! temporary HTML document — is logged as a warning inside the capture
//! stage's drop guard and never surfaces here, so a cleanup hiccup can never
//! mask the real outcome of a conversion.
//!
//! Markdown parsing has no variant of its own: pulldown-cmark is total over
//! arbitrary input, so the transform stage cannot fail.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mdpress library.
#[derive(Debug, Error)]
pub enum MdpressError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the input file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input file exists but could not be read (I/O error, not UTF-8, …).
    #[error("Failed to read Markdown from '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Render errors ─────────────────────────────────────────────────────
    /// Could not write the assembled document to the temp location.
    #[error("Failed to write temporary document '{path}': {source}")]
    TempWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The headless browser could not be started.
    #[error(
        "Failed to launch the rendering engine: {detail}\n\n\
mdpress drives a headless Chrome/Chromium instance to lay out the document\n\
and print it to PDF. If no browser was found:\n\
  • Install Google Chrome or Chromium.\n\
  • Or point the CHROME environment variable at an existing binary.\n"
    )]
    EngineLaunchFailed { detail: String },

    /// The assembled document could not be loaded into the engine.
    #[error("Failed to load '{url}' in the rendering engine: {detail}")]
    NavigationFailed { url: String, detail: String },

    /// A script evaluated inside the loaded page failed.
    #[error("Script evaluation failed in the loaded document: {detail}")]
    ScriptFailed { detail: String },

    /// Diagram rendering did not complete within the configured timeout.
    ///
    /// Usually means a malformed diagram or a failure to fetch the
    /// client-side rendering library over the network.
    #[error(
        "Diagrams did not finish rendering within {secs}s ({rendered}/{total} complete).\n\
Check the diagram source for syntax errors, or raise --diagram-timeout.\n\
Rendering the diagram library requires network access on first load."
    )]
    DiagramRenderTimeout {
        rendered: usize,
        total: usize,
        secs: u64,
    },

    /// The paginated print invocation failed.
    #[error("PDF capture failed: {detail}")]
    CaptureFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
