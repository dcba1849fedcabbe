//! # mdpress
//!
//! Convert Markdown documents to print-quality PDF using a headless browser.
//!
//! ## Why this crate?
//!
//! Typesetting-based Markdown-to-PDF tools handle prose well but cannot run
//! the client-side renderers that diagrams depend on — a `mermaid` fence
//! comes out as a verbatim code block. Instead this crate renders the
//! document the way a reader's browser would: Markdown becomes a styled HTML
//! page, a headless Chrome instance executes the diagram library until every
//! diagram is an SVG, and the page is printed to a paginated, tagged PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Transform  parse to an HTML fragment; anchor ids on headings,
//!  │                `mermaid` fences rewritten to diagram containers
//!  ├─ 2. Assemble   wrap in a standalone document (stylesheet + bootstrap)
//!  ├─ 3. Capture    load in headless Chrome, wait for diagrams, print
//!  └─ 4. Output     PDF bytes + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdpress::{convert_to_file, derive_output_path, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = derive_output_path("report.md");
//!     let stats = convert_to_file("report.md", &output, &config)?;
//!     eprintln!("{} bytes, {} diagrams", stats.pdf_bytes, stats.diagram_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdpress` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! mdpress = { version = "0.3", default-features = false }
//! ```
//!
//! ## Requirements
//!
//! A Chrome or Chromium binary must be installed (or pointed at via the
//! `CHROME` environment variable), and rendering documents with diagrams
//! needs network access on first load to fetch the diagram library.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, Margins, MarkdownProfile, PageFormat, StyleProfile,
};
pub use convert::{convert, convert_to_file, derive_output_path};
pub use error::MdpressError;
pub use output::{ConversionOutput, ConversionStats};
