//! Output types returned by conversion.

use serde::{Deserialize, Serialize};

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The captured PDF document.
    pub pdf: Vec<u8>,
    /// Timing and size statistics for the run.
    pub stats: ConversionStats,
}

/// Statistics about a conversion run.
///
/// Serialisable so callers can log or persist run records as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of headings that received anchor ids.
    pub heading_count: usize,
    /// Number of diagram containers rendered.
    pub diagram_count: usize,
    /// Size of the captured PDF in bytes.
    pub pdf_bytes: usize,
    /// Time spent parsing Markdown and assembling the document.
    pub transform_duration_ms: u64,
    /// Time spent in the rendering engine, including diagram waits.
    pub render_duration_ms: u64,
    /// Wall-clock time for the whole conversion.
    pub total_duration_ms: u64,
}
