//! Re-serialization of rendered HTML into well-formed markup for feed embedding.

use scraper::{ElementRef, Html, Node};

/// Parse `html` as a fragment and serialize every top-level node back out.
///
/// Text nodes are emitted as text (re-escaped), elements as well-formed HTML
/// with every open tag closed, comments verbatim. Node order is preserved.
/// When the parser produces nothing at all the input is returned unmodified.
pub fn normalize_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();

    if root.children().next().is_none() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    for child in root.children() {
        match child.value() {
            Node::Text(text) => push_escaped_text(&mut out, text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    out.push_str(&el.html());
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            _ => {}
        }
    }
    out
}

fn push_escaped_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
