//! Markdown → HTML rendering (GitHub-flavored subset).

use pulldown_cmark::{Options, Parser, html};

/// Render markdown to HTML with tables, strikethrough, task lists, and footnotes.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_headings() {
        let html = render_markdown("# Hi\n\nsome *text*");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<p>some <em>text</em></p>"));
    }

    #[test]
    fn renders_tables() {
        let html = render_markdown("| Name | Link |\n| ---- | ---- |\n| Foo | http://x |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>Foo</td>"));
    }

    #[test]
    fn renders_task_lists() {
        let html = render_markdown("- [x] done\n- [ ] open\n");
        assert!(html.contains("checkbox"));
    }
}
