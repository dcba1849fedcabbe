//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs, serialise them for logging, and diff two runs
//! to understand why their outputs differ.
//!
//! Typography and styling are enumerated profiles ([`MarkdownProfile`],
//! [`StyleProfile`]): plain data values selected on the config, so each
//! profile is testable on its own rather than being a compile-time branch.

use crate::error::MdpressError;
use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default uniform margin applied when the caller supplies none.
pub const DEFAULT_MARGIN: &str = "1cm";

/// Default ceiling on the client-side diagram-render wait, in seconds.
pub const DEFAULT_DIAGRAM_TIMEOUT_SECS: u64 = 30;

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`]. Immutable once the pipeline starts.
///
/// # Example
/// ```rust
/// use mdpress::{ConversionConfig, PageFormat, StyleProfile};
///
/// let config = ConversionConfig::builder()
///     .page_format(PageFormat::Letter)
///     .uniform_margin_cm(2.0)
///     .style_profile(StyleProfile::Minimal)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Where the assembled HTML document is persisted while the rendering
    /// engine loads it. Default: `temp.html`. The file is deleted when the
    /// capture stage finishes, on success and failure alike.
    pub temp_path: PathBuf,

    /// Physical page geometry for the paginated capture. Default: [`PageFormat::A4`].
    pub page_format: PageFormat,

    /// Page margins, all four sides. Default: `1cm` uniform.
    pub margins: Margins,

    /// Markdown parsing profile. Default: [`MarkdownProfile::Typographic`].
    ///
    /// This is a library-level configuration, not something the document can
    /// change: one profile per conversion.
    pub markdown_profile: MarkdownProfile,

    /// Stylesheet profile embedded in the assembled document.
    /// Default: [`StyleProfile::Book`].
    pub style_profile: StyleProfile,

    /// Ceiling on the wait for client-side diagram rendering, in seconds.
    /// Default: 30.
    ///
    /// Diagram rendering is asynchronous and driven by a script inside the
    /// loaded page; capturing before it completes would snapshot raw diagram
    /// source. When the ceiling is exceeded the conversion fails with
    /// [`MdpressError::DiagramRenderTimeout`] rather than inheriting the
    /// engine's opaque internal default.
    pub diagram_timeout_secs: u64,

    /// Wait for the document to settle (load state and web fonts) after
    /// diagrams finish, before capturing. Default: true.
    ///
    /// Best effort: if the page never reports itself settled the capture
    /// proceeds anyway with a logged warning. Disabling this trades a small
    /// risk of capturing before late-loading resources paint for a faster
    /// conversion.
    pub wait_for_settle: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            temp_path: PathBuf::from("temp.html"),
            page_format: PageFormat::A4,
            margins: Margins::default(),
            markdown_profile: MarkdownProfile::default(),
            style_profile: StyleProfile::default(),
            diagram_timeout_secs: DEFAULT_DIAGRAM_TIMEOUT_SECS,
            wait_for_settle: true,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn temp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.temp_path = path.into();
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.config.page_format = format;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.config.margins = margins;
        self
    }

    /// Set the same margin on all four sides, in centimetres.
    pub fn uniform_margin_cm(mut self, cm: f64) -> Self {
        self.config.margins = Margins::uniform_cm(cm);
        self
    }

    pub fn markdown_profile(mut self, profile: MarkdownProfile) -> Self {
        self.config.markdown_profile = profile;
        self
    }

    pub fn style_profile(mut self, profile: StyleProfile) -> Self {
        self.config.style_profile = profile;
        self
    }

    pub fn diagram_timeout_secs(mut self, secs: u64) -> Self {
        self.config.diagram_timeout_secs = secs;
        self
    }

    pub fn wait_for_settle(mut self, v: bool) -> Self {
        self.config.wait_for_settle = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, MdpressError> {
        let c = &self.config;
        if c.temp_path.as_os_str().is_empty() {
            return Err(MdpressError::InvalidConfig(
                "Temp document path must not be empty".into(),
            ));
        }
        if c.diagram_timeout_secs == 0 {
            return Err(MdpressError::InvalidConfig(
                "Diagram timeout must be ≥ 1 second".into(),
            ));
        }
        if let PageFormat::Custom { width_in, height_in } = c.page_format {
            if width_in <= 0.0 || height_in <= 0.0 {
                return Err(MdpressError::InvalidConfig(format!(
                    "Custom page size must be positive, got {width_in}in × {height_in}in"
                )));
            }
        }
        if let PageFormat::SinglePage { width_in } = c.page_format {
            if width_in <= 0.0 {
                return Err(MdpressError::InvalidConfig(format!(
                    "Single-page width must be positive, got {width_in}in"
                )));
            }
        }
        // Surface bad margin strings here rather than deep in the capture stage.
        c.margins.to_inches()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Physical page geometry passed to the paginated-capture invocation.
///
/// Named formats carry the standard print dimensions; `Custom` takes explicit
/// dimensions; `SinglePage` produces one continuous page whose height is
/// measured from the rendered content instead of a fixed physical size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageFormat {
    /// ISO A4: 8.27 in × 11.7 in. (default)
    A4,
    /// US Letter: 8.5 in × 11 in.
    Letter,
    /// Explicit page dimensions in inches.
    Custom { width_in: f64, height_in: f64 },
    /// One continuous page: fixed width, height sized to the document.
    SinglePage { width_in: f64 },
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::A4
    }
}

impl PageFormat {
    /// Fixed (width, height) in inches, or `None` when the height must be
    /// measured from the rendered content.
    pub fn dimensions_in(&self) -> Option<(f64, f64)> {
        match *self {
            PageFormat::A4 => Some((8.27, 11.7)),
            PageFormat::Letter => Some((8.5, 11.0)),
            PageFormat::Custom { width_in, height_in } => Some((width_in, height_in)),
            PageFormat::SinglePage { .. } => None,
        }
    }
}

/// Page margins as length-with-unit strings, e.g. `"1cm"`, `"0.5in"`.
///
/// Either all four sides are set or the uniform default applies; a partial
/// set is not representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

impl Margins {
    /// The same margin on all four sides.
    pub fn uniform(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }

    /// The same margin on all four sides, in centimetres.
    pub fn uniform_cm(cm: f64) -> Self {
        Self::uniform(format!("{cm}cm"))
    }

    /// Convert all four margins to inches: (top, right, bottom, left).
    ///
    /// The capture protocol takes margins in inches regardless of the unit
    /// the caller wrote them in.
    pub fn to_inches(&self) -> Result<(f64, f64, f64, f64), MdpressError> {
        Ok((
            length_to_inches(&self.top)?,
            length_to_inches(&self.right)?,
            length_to_inches(&self.bottom)?,
            length_to_inches(&self.left)?,
        ))
    }
}

/// Parse a CSS-style length (`cm`, `mm`, `in`, `px`) into inches.
pub fn length_to_inches(value: &str) -> Result<f64, MdpressError> {
    let trimmed = value.trim();
    let (number, divisor) = if let Some(n) = trimmed.strip_suffix("cm") {
        (n, 2.54)
    } else if let Some(n) = trimmed.strip_suffix("mm") {
        (n, 25.4)
    } else if let Some(n) = trimmed.strip_suffix("in") {
        (n, 1.0)
    } else if let Some(n) = trimmed.strip_suffix("px") {
        (n, 96.0)
    } else {
        return Err(MdpressError::InvalidConfig(format!(
            "Length '{value}' has no unit; expected one of cm, mm, in, px"
        )));
    };

    let parsed: f64 = number.trim().parse().map_err(|_| {
        MdpressError::InvalidConfig(format!("Length '{value}' is not a number with a unit"))
    })?;
    if parsed < 0.0 {
        return Err(MdpressError::InvalidConfig(format!(
            "Length '{value}' must not be negative"
        )));
    }
    Ok(parsed / divisor)
}

/// Markdown parsing profile: which syntax extensions the parser enables.
///
/// Two profiles exist because the source documents fall into two camps:
/// plain CommonMark notes, and typeset manuscripts that want tables,
/// footnotes and smart punctuation. The profile is fixed per conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkdownProfile {
    /// CommonMark only; no extensions, no typographic substitutions.
    Minimal,
    /// Tables, footnotes, strikethrough, task lists, heading attributes
    /// (`{#explicit-id}`), and smart punctuation (curly quotes, en/em
    /// dashes). (default)
    #[default]
    Typographic,
}

impl MarkdownProfile {
    /// The pulldown-cmark option set for this profile.
    pub fn parser_options(&self) -> Options {
        match self {
            MarkdownProfile::Minimal => Options::empty(),
            MarkdownProfile::Typographic => {
                Options::ENABLE_TABLES
                    | Options::ENABLE_FOOTNOTES
                    | Options::ENABLE_STRIKETHROUGH
                    | Options::ENABLE_TASKLISTS
                    | Options::ENABLE_SMART_PUNCTUATION
                    | Options::ENABLE_HEADING_ATTRIBUTES
            }
        }
    }
}

/// Stylesheet profile embedded into the assembled document.
///
/// Each profile is a data value (a CSS block), not a code branch, so the
/// assembler stays a pure function of (fragment, profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StyleProfile {
    /// Bare margin reset; the engine's defaults do the rest.
    Minimal,
    /// Print-typeset book styling: serif body, justified paragraphs,
    /// monospace code blocks, underlined fragment anchors. (default)
    #[default]
    Book,
}

impl StyleProfile {
    /// The CSS for this profile.
    pub fn css(&self) -> &'static str {
        match self {
            StyleProfile::Minimal => MINIMAL_CSS,
            StyleProfile::Book => BOOK_CSS,
        }
    }
}

const MINIMAL_CSS: &str = "\
body { margin: 0; }
";

const BOOK_CSS: &str = "\
body {
  font-family: Georgia, 'Times New Roman', serif;
  font-size: 12pt;
  line-height: 1.55;
  margin: 0;
  color: #1a1a1a;
}
h1, h2, h3, h4, h5, h6 {
  font-family: Georgia, 'Times New Roman', serif;
  line-height: 1.25;
  margin: 1.4em 0 0.5em;
  page-break-after: avoid;
}
h1 { font-size: 1.9em; }
h2 { font-size: 1.5em; }
h3 { font-size: 1.2em; }
p { text-align: justify; margin: 0 0 0.8em; }
pre {
  font-family: 'Courier New', monospace;
  font-size: 10pt;
  background: #f6f6f4;
  padding: 0.7em 0.9em;
  overflow-x: hidden;
  white-space: pre-wrap;
  page-break-inside: avoid;
}
code { font-family: 'Courier New', monospace; font-size: 0.92em; }
blockquote {
  margin: 0.8em 1.5em;
  padding-left: 0.8em;
  border-left: 3px solid #c9c9c4;
  color: #444;
}
a[href^='#'] { color: inherit; text-decoration: underline; }
table { border-collapse: collapse; margin: 0.8em 0; }
th, td { border: 1px solid #bbb; padding: 0.3em 0.6em; }
pre.mermaid { background: none; text-align: center; page-break-inside: avoid; }
img, svg { max-width: 100%; }
";
