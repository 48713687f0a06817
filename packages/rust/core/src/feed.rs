//! RSS 2.0 feed builder.
//!
//! The feed is rebuilt from scratch on every run: one entry per publishable
//! issue, in the tracker's newest-first order.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use issuepress_markdown::{is_valid_xml_char, render_body};
use issuepress_shared::{
    IssueFilter, IssuePressError, IssueTracker, PipelineConfig, Result, SiteConfig,
};

use crate::links::SiteLinks;

/// Namespace of the feed icon/logo extension.
pub const WEBFEEDS_NS: &str = "http://webfeeds.org/rss/1.0";

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

const GENERATOR: &str = concat!("issuepress ", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Channel-level metadata.
#[derive(Debug, Clone)]
pub struct Channel {
    pub title: String,
    /// Site URL.
    pub link: String,
    pub description: String,
    pub language: String,
    pub author_name: String,
    pub author_email: Option<String>,
    /// Where the feed itself is served.
    pub self_link: String,
    pub last_build: DateTime<Utc>,
}

/// Channel image, emitted together with the icon extensions.
#[derive(Debug, Clone)]
pub struct FeedImage {
    pub url: String,
    pub title: String,
    pub link: String,
    pub width: u32,
    pub height: u32,
    pub description: String,
}

/// One feed item, derived from one issue.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// Stable identifier: the issue URL.
    pub id: String,
    /// Site permalink.
    pub link: String,
    pub title: String,
    pub author: String,
    pub published: DateTime<Utc>,
    pub categories: Vec<String>,
    /// Plain-text summary.
    pub description: String,
    /// Full normalized HTML, written as CDATA.
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Feed {
    pub channel: Channel,
    pub image: Option<FeedImage>,
    pub entries: Vec<FeedEntry>,
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the feed from the tracker's current state.
///
/// `with_icon` attaches the image block and the icon extensions. Any tracker
/// error aborts the build: a partial feed would silently drop entries.
#[instrument(skip_all, fields(with_icon = with_icon))]
pub fn build_feed(
    tracker: &dyn IssueTracker,
    site: &SiteConfig,
    pipeline: &PipelineConfig,
    with_icon: bool,
    now: DateTime<Utc>,
) -> Result<Feed> {
    let repo = tracker.repository();
    let links = SiteLinks::new(site, repo, &pipeline.feed_filename);

    let channel = Channel {
        title: site.title.clone(),
        link: links.site(),
        description: site.description.clone(),
        language: site.language.clone(),
        author_name: site.author_name.clone(),
        author_email: site.author_email.clone(),
        self_link: links.feed.clone(),
        last_build: now,
    };

    let image = with_icon.then(|| FeedImage {
        url: links.icon(),
        title: site.title.clone(),
        link: links.site(),
        width: site.icon_size,
        height: site.icon_size,
        description: format!("{} RSS icon", site.title),
    });

    let mut entries = Vec::new();
    for issue in tracker.list_issues(&IssueFilter::all_newest_first()) {
        let issue = issue?;
        if !issue.is_publishable(&repo.owner) {
            continue;
        }

        let rendered = render_body(
            issue.body.as_deref().unwrap_or_default(),
            pipeline.summary_max_chars,
        );
        let description = if rendered.summary.is_empty() {
            issue.title.clone()
        } else {
            rendered.summary
        };
        debug!(number = issue.number, "feed entry");

        entries.push(FeedEntry {
            id: issue.html_url.clone(),
            link: links.issue(issue.number),
            title: issue.title,
            author: site.author_name.clone(),
            published: issue.created_at,
            categories: issue.labels.into_iter().map(|l| l.name).collect(),
            description,
            content: rendered.html,
        });
    }

    info!(entries = entries.len(), "feed built");
    Ok(Feed {
        channel,
        image,
        entries,
    })
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

impl Feed {
    /// Serialize as an RSS 2.0 document.
    pub fn to_rss(&self) -> String {
        let ch = &self.channel;
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        xml.push_str(&format!(
            "<rss version=\"2.0\" xmlns:atom=\"{ATOM_NS}\" xmlns:content=\"{CONTENT_NS}\" xmlns:dc=\"{DC_NS}\""
        ));
        if self.image.is_some() {
            xml.push_str(&format!(
                " xmlns:itunes=\"{ITUNES_NS}\" xmlns:webfeeds=\"{WEBFEEDS_NS}\""
            ));
        }
        xml.push_str(">\n<channel>\n");

        push_element(&mut xml, 1, "title", &ch.title);
        push_element(&mut xml, 1, "link", &ch.link);
        push_element(&mut xml, 1, "description", &ch.description);
        xml.push_str(&format!(
            "  <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
            escape_xml(&ch.self_link)
        ));
        push_element(&mut xml, 1, "language", &ch.language);
        if let Some(email) = &ch.author_email {
            push_element(
                &mut xml,
                1,
                "managingEditor",
                &format!("{email} ({})", ch.author_name),
            );
        }
        push_element(&mut xml, 1, "generator", GENERATOR);
        push_element(&mut xml, 1, "lastBuildDate", &ch.last_build.to_rfc2822());

        if let Some(image) = &self.image {
            xml.push_str("  <image>\n");
            push_element(&mut xml, 2, "url", &image.url);
            push_element(&mut xml, 2, "title", &image.title);
            push_element(&mut xml, 2, "link", &image.link);
            push_element(&mut xml, 2, "width", &image.width.to_string());
            push_element(&mut xml, 2, "height", &image.height.to_string());
            push_element(&mut xml, 2, "description", &image.description);
            xml.push_str("  </image>\n");
            xml.push_str(&format!(
                "  <itunes:image href=\"{}\"/>\n",
                escape_xml(&image.url)
            ));
            push_element(&mut xml, 1, "webfeeds:icon", &image.url);
            push_element(&mut xml, 1, "webfeeds:logo", &image.url);
        }

        for entry in &self.entries {
            push_item(&mut xml, entry);
        }

        xml.push_str("</channel>\n</rss>\n");
        xml
    }

    /// Write the serialized feed to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| IssuePressError::io(parent, e))?;
        }
        std::fs::write(path, self.to_rss()).map_err(|e| IssuePressError::io(path, e))
    }
}

fn push_item(xml: &mut String, entry: &FeedEntry) {
    xml.push_str("  <item>\n");
    push_element(xml, 2, "title", &entry.title);
    push_element(xml, 2, "link", &entry.link);
    push_element(xml, 2, "description", &entry.description);
    xml.push_str(&format!(
        "    <content:encoded>{}</content:encoded>\n",
        cdata(&entry.content)
    ));
    xml.push_str(&format!(
        "    <guid isPermaLink=\"false\">{}</guid>\n",
        escape_xml(&entry.id)
    ));
    push_element(xml, 2, "dc:creator", &entry.author);
    for category in &entry.categories {
        push_element(xml, 2, "category", category);
    }
    push_element(xml, 2, "pubDate", &entry.published.to_rfc2822());
    push_element(
        xml,
        2,
        "dc:date",
        &entry.published.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    );
    xml.push_str("  </item>\n");
}

fn push_element(xml: &mut String, depth: usize, name: &str, text: &str) {
    xml.push_str(&"  ".repeat(depth));
    xml.push_str(&format!("<{name}>{}</{name}>\n", escape_xml(text)));
}

/// Escape text for element content or attribute values, dropping characters
/// that XML cannot carry.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `text` in a CDATA section, splitting any `]]>` it contains.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}
