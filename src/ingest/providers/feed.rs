// src/ingest/providers/feed.rs
//! RSS 2.0 / Atom parsing into a flat entry list.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

// Atom text constructs carry a `type` attribute; only the text matters.
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

/// One feed entry, fields as found in the document (not yet normalized).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
}

impl From<RssItem> for FeedEntry {
    fn from(it: RssItem) -> Self {
        Self {
            title: it.title,
            link: it.link,
            published: it.pub_date,
            summary: it.description,
        }
    }
}

impl From<AtomEntry> for FeedEntry {
    fn from(e: AtomEntry) -> Self {
        // rel defaults to "alternate" when absent.
        let link = e
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| e.links.first())
            .map(|l| l.href.clone());
        Self {
            title: e.title.map(|t| t.value),
            link,
            published: e.published.or(e.updated),
            summary: e.summary.or(e.content).map(|t| t.value),
        }
    }
}

/// Parse an RSS or Atom document.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    if xml_clean.contains("<rss") {
        let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;
        Ok(rss.channel.item.into_iter().map(FeedEntry::from).collect())
    } else if xml_clean.contains("<feed") {
        let atom: AtomFeed = from_str(&xml_clean).context("parsing atom xml")?;
        Ok(atom.entry.into_iter().map(FeedEntry::from).collect())
    } else {
        Err(anyhow!("document is neither rss nor atom"))
    }
}

// XML only knows five named entities; feeds routinely leak HTML ones.
fn scrub_html_entities_for_xml(s: &str) -> String {
    let folded = s
        .replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'");

    static RE_ENTITY: OnceCell<Regex> = OnceCell::new();
    let re = RE_ENTITY.get_or_init(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").unwrap());
    re.replace_all(&folded, |c: &Captures| {
        let name = &c[1];
        if matches!(name, "amp" | "lt" | "gt" | "quot" | "apos") {
            return c[0].to_string();
        }
        let decoded = html_escape::decode_html_entities(&c[0]);
        if decoded == c[0] {
            // Unknown to HTML too: keep the text, escape the ampersand.
            format!("&amp;{name};")
        } else {
            html_escape::encode_text(&decoded).into_owned()
        }
    })
    .into_owned()
}
