//! CLI binary for mdpress.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdpress::{convert_to_file, derive_output_path, ConversionConfig, Margins, PageFormat, StyleProfile};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (report.md → report.pdf)
  mdpress --input report.md

  # Explicit output path
  mdpress --input report.md --output build/report.pdf

  # US Letter pages, 2cm margins
  mdpress --input report.md --format letter --margin 2

  # Minimal styling, no settle wait (fastest)
  mdpress --input notes.md --style minimal --no-wait-settle

  # Slow network / large diagrams
  mdpress --input architecture.md --diagram-timeout 120

DIAGRAMS:
  Fenced code blocks tagged `mermaid` are rendered as diagrams:

    ```mermaid
    graph TD;
      A-->B;
    ```

  The diagram library is fetched from a CDN when the page loads, so the
  first conversion of a document with diagrams needs network access.

ENVIRONMENT VARIABLES:
  MDPRESS_OUTPUT           Default output path
  MDPRESS_FORMAT           Default page format (a4, letter)
  MDPRESS_MARGIN           Default uniform margin in centimeters
  MDPRESS_STYLE            Default style profile (book, minimal)
  MDPRESS_DIAGRAM_TIMEOUT  Default diagram-render timeout in seconds
  CHROME                   Path to a Chrome/Chromium binary

SETUP:
  1. Install Google Chrome or Chromium (or set CHROME=/path/to/chrome).
  2. Convert: mdpress --input document.md
"#;

/// Convert Markdown documents to print-quality PDF.
#[derive(Parser, Debug)]
#[command(
    name = "mdpress",
    version,
    about = "Convert Markdown documents to print-quality PDF",
    long_about = "Convert Markdown documents to paginated, tagged PDF by rendering them in a \
headless Chrome/Chromium instance. Mermaid diagram blocks are rendered to vector graphics, \
headings carry stable anchor ids, and output is styled with a print-typeset stylesheet.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source Markdown file.
    #[arg(short, long)]
    input: PathBuf,

    /// Destination PDF file. Default: input path with a .pdf extension.
    #[arg(short, long, env = "MDPRESS_OUTPUT")]
    output: Option<PathBuf>,

    /// Where to persist the intermediate HTML document.
    #[arg(long, env = "MDPRESS_TEMP", default_value = "temp.html")]
    temp: PathBuf,

    /// Page format: a4 or letter.
    #[arg(
        long,
        env = "MDPRESS_FORMAT",
        value_enum,
        ignore_case = true,
        default_value = "a4"
    )]
    format: FormatArg,

    /// Uniform margin in centimeters applied to all four sides.
    #[arg(long, env = "MDPRESS_MARGIN", default_value_t = 1.0)]
    margin: f64,

    /// Stylesheet profile: book or minimal.
    #[arg(
        long,
        env = "MDPRESS_STYLE",
        value_enum,
        ignore_case = true,
        default_value = "book"
    )]
    style: StyleArg,

    /// Ceiling on the diagram-render wait, in seconds.
    #[arg(long, env = "MDPRESS_DIAGRAM_TIMEOUT", default_value_t = 30)]
    diagram_timeout: u64,

    /// Skip the post-diagram settle wait (load state, web fonts).
    #[arg(long, env = "MDPRESS_NO_WAIT_SETTLE")]
    no_wait_settle: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDPRESS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDPRESS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    A4,
    Letter,
}

impl From<FormatArg> for PageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::A4 => PageFormat::A4,
            FormatArg::Letter => PageFormat::Letter,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Book,
    Minimal,
}

impl From<StyleArg> for StyleProfile {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::Book => StyleProfile::Book,
            StyleArg::Minimal => StyleProfile::Minimal,
        }
    }
}


fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_spinner = !cli.quiet && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = ConversionConfig::builder()
        .temp_path(&cli.temp)
        .page_format(cli.format.into())
        .margins(Margins::uniform_cm(cli.margin))
        .style_profile(cli.style.into())
        .diagram_timeout_secs(cli.diagram_timeout)
        .wait_for_settle(!cli.no_wait_settle)
        .build()
        .context("Invalid configuration")?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&cli.input));

    // ── Run conversion ───────────────────────────────────────────────────
    let spinner = if !show_spinner {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.set_message(cli.input.display().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    let result = convert_to_file(&cli.input, &output_path, &config);

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let stats = result.context("Conversion failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}  →  {}",
            green("✔"),
            dim(&format!(
                "{} headings, {} diagrams, {}ms",
                stats.heading_count, stats.diagram_count, stats.total_duration_ms
            )),
            bold(&output_path.display().to_string()),
        );
    }

    Ok(())
}
