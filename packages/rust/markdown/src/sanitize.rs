//! Text sanitizing: XML character validity, HTML → plain text, summaries.
//!
//! None of these functions fail. Malformed input degrades to best-effort text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

/// Ellipsis appended to truncated summaries.
pub const ELLIPSIS: char = '…';

/// Whether `c` may appear in an XML 1.0 document.
pub fn is_valid_xml_char(c: char) -> bool {
    let cp = c as u32;
    // ordered by presumed frequency
    (0x20..=0xD7FF).contains(&cp)
        || matches!(cp, 0x9 | 0xA | 0xD)
        || (0xE000..=0xFFFD).contains(&cp)
        || (0x10000..=0x10FFFF).contains(&cp)
}

/// Drop every character that is not valid in an XML document.
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars().filter(|&c| is_valid_xml_char(c)).collect()
}

/// Convert an HTML fragment to normalized single-line plain text.
///
/// Entities are decoded, every whitespace run becomes one space, and the
/// result is trimmed.
pub fn html_to_plain_text(html: &str) -> String {
    let text = match extract_text(html) {
        Some(text) => decode_entities(&text),
        None => {
            tracing::debug!("html tree yielded no text, falling back to tag stripping");
            strip_tags(html)
        }
    };
    collapse_whitespace(&text)
}

/// Build a feed summary of at most `max_chars` characters.
///
/// Truncation counts Unicode scalar values and cuts at `max_chars - 1`,
/// then appends [`ELLIPSIS`]. It does not look for word boundaries.
pub fn make_summary(html: &str, max_chars: usize) -> String {
    let summary = html_to_plain_text(html);
    if summary.chars().count() <= max_chars {
        return summary;
    }

    let cut: String = summary.chars().take(max_chars.saturating_sub(1)).collect();
    let mut truncated = cut.trim_end().to_string();
    truncated.push(ELLIPSIS);
    truncated
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Text content of the parsed fragment. `None` when the tree swallowed
/// visible input (e.g. an unterminated comment) and tag stripping does better.
fn extract_text(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();

    if text.trim().is_empty() && !strip_tags(html).trim().is_empty() {
        return None;
    }
    Some(text)
}

/// Regex tag stripping followed by entity decoding.
fn strip_tags(html: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

    let stripped = TAG_RE.replace_all(html, " ");
    decode_entities(&stripped)
}

/// Decode character references in plain text, named ones included.
///
/// The text is re-read by the HTML tokenizer with `<` escaped, so only
/// references change and no markup is introduced.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let escaped = s.replace('<', "&lt;");
    Html::parse_fragment(&escaped).root_element().text().collect()
}

fn collapse_whitespace(s: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(s, " ").trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_char_ranges() {
        assert!(is_valid_xml_char('\t'));
        assert!(is_valid_xml_char('\n'));
        assert!(is_valid_xml_char('\r'));
        assert!(is_valid_xml_char('a'));
        assert!(is_valid_xml_char('中'));
        assert!(is_valid_xml_char('\u{E000}'));
        assert!(is_valid_xml_char('\u{1F600}'));
        assert!(!is_valid_xml_char('\u{0}'));
        assert!(!is_valid_xml_char('\u{8}'));
        assert!(!is_valid_xml_char('\u{1F}'));
        assert!(!is_valid_xml_char('\u{FFFE}'));
        assert!(!is_valid_xml_char('\u{FFFF}'));
    }

    #[test]
    fn strip_drops_control_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0}b\u{8}c\u{B}d"), "abcd");
    }

    #[test]
    fn strip_is_idempotent_and_identity_on_valid_text() {
        let dirty = "x\u{1}y\u{FFFF}z\n\tend 🎉";
        let once = strip_invalid_xml_chars(dirty);
        assert_eq!(strip_invalid_xml_chars(&once), once);

        let clean = "already valid — 中文 🎉\r\n";
        assert_eq!(strip_invalid_xml_chars(clean), clean);
    }

    #[test]
    fn plain_text_from_markup() {
        let html = "<h1>Title</h1>\n<p>Some <strong>bold</strong>\n\n text &amp; more</p>";
        assert_eq!(html_to_plain_text(html), "Title Some bold text & more");
    }

    #[test]
    fn plain_text_of_malformed_fragment() {
        assert_eq!(html_to_plain_text("<p>unclosed <em>emphasis"), "unclosed emphasis");
        assert_eq!(html_to_plain_text("plain   words\n\nonly"), "plain words only");
    }

    #[test]
    fn plain_text_falls_back_to_tag_stripping() {
        // the parser turns the rest of the input into a comment
        assert_eq!(html_to_plain_text("<!-- open &amp; hidden"), "<!-- open & hidden");
    }

    #[test]
    fn plain_text_of_empty_input() {
        assert_eq!(html_to_plain_text(""), "");
        assert_eq!(html_to_plain_text("   \n "), "");
    }

    #[test]
    fn decode_numeric_entities() {
        assert_eq!(decode_entities("&#65;&#x42;&lt;&bogus;"), "AB<&bogus;");
    }

    #[test]
    fn decode_named_entities() {
        assert_eq!(decode_entities("&copy; 2024 &hellip; &eacute;t&eacute;"), "© 2024 … été");
        assert_eq!(decode_entities("a <b> & c"), "a <b> & c");
    }

    #[test]
    fn entities_left_in_parsed_text_are_decoded() {
        // escaped once in the markup, the tree text still carries `&lt;`
        let html = "<p>see <code>&amp;lt;b&amp;gt;</code> &amp;copy; here</p>";
        assert_eq!(html_to_plain_text(html), "see <b> © here");
    }

    #[test]
    fn literal_angle_brackets_survive() {
        assert_eq!(html_to_plain_text("<p>&lt;b&gt; stays</p>"), "<b> stays");
    }

    #[test]
    fn summary_at_threshold_is_unchanged() {
        let text = "a".repeat(360);
        assert_eq!(make_summary(&format!("<p>{text}</p>"), 360), text);
    }

    #[test]
    fn summary_over_threshold_is_truncated() {
        let text = "b".repeat(400);
        let summary = make_summary(&format!("<p>{text}</p>"), 360);
        assert_eq!(summary.chars().count(), 360);
        assert!(summary.ends_with(ELLIPSIS));
        assert_eq!(summary.chars().filter(|&c| c == ELLIPSIS).count(), 1);
        assert!(text.starts_with(summary.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn summary_trims_before_ellipsis() {
        // the 9th character is a space, so the cut ends in whitespace
        let summary = make_summary("<p>abcdefgh ijklmnop</p>", 10);
        assert_eq!(summary, "abcdefgh…");
    }

    #[test]
    fn summary_counts_characters_not_bytes() {
        let text = "中".repeat(20);
        let summary = make_summary(&text, 10);
        assert_eq!(summary.chars().count(), 10);
        assert_eq!(summary, format!("{}…", "中".repeat(9)));
    }
}
