//! Markdown rendering and HTML text handling for feed output.
//!
//! Issue bodies go through three steps before they land in the feed:
//! invalid XML characters are stripped, the markdown is rendered to HTML, and
//! the HTML is re-serialized into well-formed markup. Summaries are derived
//! from that markup as bounded plain text.

mod normalize;
mod render;
mod sanitize;

pub use normalize::normalize_html;
pub use render::render_markdown;
pub use sanitize::{
    ELLIPSIS, html_to_plain_text, is_valid_xml_char, make_summary, strip_invalid_xml_chars,
};

/// Rendered feed content for one issue body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    /// Normalized HTML of the full body.
    pub html: String,
    /// Plain-text summary, empty when the body has no visible text.
    pub summary: String,
}

/// Run an issue body through the full feed content pipeline.
pub fn render_body(body: &str, summary_max_chars: usize) -> RenderedBody {
    let sanitized = strip_invalid_xml_chars(body);
    let html = normalize_html(&render_markdown(&sanitized));
    let summary = make_summary(&html, summary_max_chars);
    RenderedBody { html, summary }
}
