//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ transform ──▶ assemble ──▶ capture
//! (source)   (pulldown)      (HTML doc)  (headless Chrome)
//! ```
//!
//! 1. [`transform`] — parse Markdown into an HTML fragment; inject heading
//!    anchor ids and rewrite `mermaid` fences into diagram containers
//! 2. [`assemble`]  — wrap the fragment into a standalone document with the
//!    diagram bootstrap and the configured stylesheet
//! 3. [`capture`]   — persist the document, load it in a headless browser,
//!    wait for diagrams to render, print to PDF; the only stage with I/O

pub mod assemble;
pub mod capture;
pub mod transform;
