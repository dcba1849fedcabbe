//! Markdown → HTML fragment: anchor ids and diagram-container rewriting.
//!
//! ## Why rewrite the event stream instead of the HTML?
//!
//! A regex over the rendered HTML would have to pattern-match the exact
//! `<pre><code class="language-…">` shape the parser happens to emit — an
//! implicit contract that breaks silently whenever the parser changes its
//! output. Here the rewrite happens inside the pulldown-cmark event stream:
//! a fenced block tagged `mermaid` never reaches the HTML renderer as a code
//! block at all. The substitution is structural, so there is no output shape
//! to drift out of sync with.
//!
//! Anchor ids are injected the same way: heading events are buffered until
//! the heading closes, the plain-text title is slugged, and the start tag is
//! re-emitted with its `id` attribute set.

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;

use crate::config::MarkdownProfile;

/// Info-string tag marking a fenced block as diagram source.
pub const DIAGRAM_TAG: &str = "mermaid";

/// Fallback anchor id for headings whose title slugs to nothing
/// (e.g. a heading consisting only of punctuation).
const EMPTY_ANCHOR_FALLBACK: &str = "section";

/// The HTML fragment produced from one Markdown document.
#[derive(Debug, Clone)]
pub struct TransformedDocument {
    /// Rendered HTML fragment (no `<html>`/`<body>` wrapper).
    pub html: String,
    /// Anchor ids in document order, one per heading.
    ///
    /// Ids are derived from title text alone, so two headings with the same
    /// title share the same id. That collision is preserved, not corrected.
    pub anchor_ids: Vec<String>,
    /// Number of diagram containers emitted.
    pub diagram_count: usize,
}

/// Parse Markdown into an HTML fragment.
///
/// Pure function of the input text and the profile: every heading gets an
/// `id` derived from its title via [`anchor_id`], and every fenced block
/// tagged [`DIAGRAM_TAG`] becomes a `<pre class="mermaid">` container whose
/// text content is the verbatim diagram source.
pub fn transform(markdown: &str, profile: MarkdownProfile) -> TransformedDocument {
    let mut parser = Parser::new_ext(markdown, profile.parser_options());
    let mut events: Vec<Event> = Vec::new();
    let mut anchor_ids: Vec<String> = Vec::new();
    let mut diagram_count = 0usize;

    while let Some(event) = parser.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                // Buffer the heading body to recover its plain-text title
                // before the start tag is emitted.
                let mut inner: Vec<Event> = Vec::new();
                let mut title = String::new();
                for ev in parser.by_ref() {
                    match ev {
                        Event::End(TagEnd::Heading(_)) => break,
                        ev => {
                            match &ev {
                                Event::Text(text) => title.push_str(text),
                                Event::Code(code) => title.push_str(code),
                                _ => {}
                            }
                            inner.push(ev);
                        }
                    }
                }

                // An explicit `{#id}` attribute (Typographic profile) wins
                // over derivation.
                let slug = match id {
                    Some(explicit) => explicit.to_string(),
                    None => anchor_id(&title),
                };
                anchor_ids.push(slug.clone());

                events.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(slug.into()),
                    classes,
                    attrs,
                }));
                events.extend(inner);
                events.push(Event::End(TagEnd::Heading(level)));
            }

            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                if info_language(&info) == Some(DIAGRAM_TAG) =>
            {
                let mut source = String::new();
                for ev in parser.by_ref() {
                    match ev {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => source.push_str(&text),
                        _ => {}
                    }
                }
                diagram_count += 1;
                events.push(Event::Html(
                    format!(
                        "<pre class=\"mermaid\">{}</pre>\n",
                        escape_html(&source)
                    )
                    .into(),
                ));
            }

            other => events.push(other),
        }
    }

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());

    TransformedDocument {
        html,
        anchor_ids,
        diagram_count,
    }
}

// ── Anchor-id derivation ─────────────────────────────────────────────────

static RE_NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Derive a URL-fragment-safe anchor id from a heading title.
///
/// Lowercase; drop everything that is not a word character, whitespace or a
/// hyphen; collapse whitespace runs to a single hyphen; collapse hyphen runs;
/// trim leading/trailing hyphens. Depends only on the title text — never on
/// heading level or position — so the derivation is deterministic and
/// duplicate titles yield duplicate ids.
pub fn anchor_id(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = RE_NON_SLUG.replace_all(&lowered, "");
    let hyphenated = RE_WHITESPACE.replace_all(stripped.trim(), "-");
    let collapsed = RE_HYPHEN_RUNS.replace_all(&hyphenated, "-");
    let slug = collapsed.trim_matches('-');
    if slug.is_empty() {
        EMPTY_ANCHOR_FALLBACK.to_string()
    } else {
        slug.to_string()
    }
}

/// First word of a fence info string, or `None` when the fence is bare.
fn info_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

/// Minimal HTML escape for text content of the diagram container.
///
/// The client-side library reads the container's *text content*, so entity
/// escaping here round-trips the source verbatim through the DOM.
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_id_strips_punctuation_and_case() {
        assert_eq!(anchor_id("Hello, World!"), "hello-world");
    }

    #[test]
    fn anchor_id_collapses_whitespace() {
        assert_eq!(anchor_id("  Multiple   Spaces  "), "multiple-spaces");
    }

    #[test]
    fn anchor_id_collapses_hyphen_runs() {
        assert_eq!(anchor_id("a -- b"), "a-b");
        assert_eq!(anchor_id("--edge--"), "edge");
    }

    #[test]
    fn anchor_id_keeps_word_chars_and_hyphens() {
        assert_eq!(anchor_id("fn main_loop() — v2"), "fn-main_loop-v2");
    }

    #[test]
    fn anchor_id_empty_title_falls_back() {
        assert_eq!(anchor_id("!!!"), "section");
        assert_eq!(anchor_id(""), "section");
    }

    #[test]
    fn headings_get_ids_in_fragment() {
        let doc = transform("# Hello, World!\n\ntext\n", MarkdownProfile::Minimal);
        assert!(
            doc.html.contains("<h1 id=\"hello-world\">"),
            "got: {}",
            doc.html
        );
        assert_eq!(doc.anchor_ids, vec!["hello-world"]);
    }

    #[test]
    fn duplicate_headings_share_an_id() {
        let doc = transform("# Setup\n\n## Setup\n", MarkdownProfile::Minimal);
        assert_eq!(doc.anchor_ids, vec!["setup", "setup"]);
        // Both occurrences carry the same (colliding) id, by design.
        assert_eq!(doc.html.matches("id=\"setup\"").count(), 2);
    }

    #[test]
    fn explicit_heading_id_wins_over_derivation() {
        let doc = transform("# Long Title {#intro}\n", MarkdownProfile::Typographic);
        assert_eq!(doc.anchor_ids, vec!["intro"]);
        assert!(doc.html.contains("id=\"intro\""), "got: {}", doc.html);
        assert!(!doc.html.contains("long-title"), "got: {}", doc.html);
    }

    #[test]
    fn heading_id_uses_inline_code_text() {
        let doc = transform("## Using `cargo build`\n", MarkdownProfile::Minimal);
        assert_eq!(doc.anchor_ids, vec!["using-cargo-build"]);
    }

    #[test]
    fn diagram_block_becomes_container() {
        let md = "# T\n\n```mermaid\ngraph TD;\n  A-->B;\n```\n";
        let doc = transform(md, MarkdownProfile::Typographic);
        assert_eq!(doc.diagram_count, 1);
        assert!(doc.html.contains("<pre class=\"mermaid\">"), "got: {}", doc.html);
        assert!(doc.html.contains("A--&gt;B;"), "got: {}", doc.html);
        // Not left behind as a plain code block.
        assert!(!doc.html.contains("language-mermaid"), "got: {}", doc.html);
    }

    #[test]
    fn ordinary_code_blocks_are_untouched() {
        let md = "```rust\nfn main() {}\n```\n";
        let doc = transform(md, MarkdownProfile::Typographic);
        assert_eq!(doc.diagram_count, 0);
        assert!(doc.html.contains("language-rust"), "got: {}", doc.html);
        assert!(!doc.html.contains("class=\"mermaid\""));
    }

    #[test]
    fn diagram_info_string_may_carry_extra_words() {
        let md = "```mermaid theme=dark\ngraph LR; A-->B;\n```\n";
        let doc = transform(md, MarkdownProfile::Typographic);
        assert_eq!(doc.diagram_count, 1);
    }

    #[test]
    fn typographic_profile_applies_smart_punctuation() {
        let doc = transform("\"quoted\"\n", MarkdownProfile::Typographic);
        assert!(doc.html.contains('\u{201C}'), "got: {}", doc.html);

        let plain = transform("\"quoted\"\n", MarkdownProfile::Minimal);
        assert!(plain.html.contains("&quot;") || plain.html.contains('"'));
    }

    #[test]
    fn typographic_profile_renders_tables() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let doc = transform(md, MarkdownProfile::Typographic);
        assert!(doc.html.contains("<table>"), "got: {}", doc.html);
    }
}
