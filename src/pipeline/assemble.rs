//! Fragment → standalone HTML document.
//!
//! The assembled document is what the rendering engine actually loads: the
//! fragment body, a `<style>` block from the configured profile, and the
//! diagram-rendering bootstrap. The bootstrap initialises the client-side
//! library with `startOnLoad: true`, so every `<pre class="mermaid">`
//! container the transform stage emitted is picked up and replaced with a
//! rendered SVG once the page loads — which is exactly the condition the
//! capture stage polls for.
//!
//! Pure function, no I/O: persisting the document is the capture stage's job.

use crate::config::StyleProfile;

/// Script tag loading and initialising the diagram-rendering library.
///
/// Pinned to a major version so a breaking library release cannot silently
/// change rendering behaviour between two runs of the same binary.
const DIAGRAM_BOOTSTRAP: &str = "\
<script type=\"module\">
  import mermaid from 'https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs';
  mermaid.initialize({ startOnLoad: true });
</script>";

/// Wrap an HTML fragment into a complete, self-contained document.
///
/// The fragment is embedded verbatim — in particular every diagram container
/// appears exactly as the transform stage emitted it, so the client-side
/// renderer can find and populate them.
pub fn assemble(fragment: &str, style: StyleProfile) -> String {
    format!(
        "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<meta charset=\"utf-8\">\n\
{bootstrap}\n\
<style>\n{css}</style>\n\
</head>\n\
<body>\n\
{fragment}\n\
</body>\n\
</html>\n",
        bootstrap = DIAGRAM_BOOTSTRAP,
        css = style.css(),
        fragment = fragment,
    )
}
