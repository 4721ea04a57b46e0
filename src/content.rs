//! Field interpretation: from a raw [`Record`] to what a page shows.
//!
//! The sheet is authored by hand, so every rule here is forgiving. Empty
//! cells simply leave their section out, and nothing in this module fails.
//!
//! ## Columns
//!
//! | Column | Used as |
//! |--------|---------|
//! | `title`, `description`, `preview` | Text, shown when non-empty |
//! | `category` → `collection` | Meta line under the title (first non-empty) |
//! | `embed` / `Embed` | [`EmbedDirective`] via [`normalize_embed`] |
//! | `links` | Comma-separated; `label__url` or a bare URL |
//! | `tools` | "Tools used" line |
//! | `content` | Long-form Markdown; every line break is kept |
//! | `pic1..picN`, `cap1..capN` | Image sequence, ends at the first empty `picN` |
//! | `image_main` | Gallery card thumbnail |

use crate::config::RenderConfig;
use crate::embed::{EmbedDirective, clean_embed_value, normalize_embed};
use crate::types::Record;
use pulldown_cmark::{Event, Parser, html as md_html};

/// A labelled outbound link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// One image of a post's image sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostImage {
    /// 1-based position in the sequence (`picN`).
    pub number: usize,
    pub src: String,
    pub caption: Option<String>,
}

/// Everything a post page displays, derived from one record.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub collection: String,
    /// `category`, else `collection`, else empty.
    pub meta: String,
    pub description: String,
    pub preview: String,
    pub embed: EmbedDirective,
    pub links: Vec<Link>,
    pub tools: String,
    /// Raw `content` cell; see [`render_long_content`].
    pub content: String,
    pub images: Vec<PostImage>,
}

impl PostView {
    pub fn from_record(record: &Record, render: &RenderConfig) -> Self {
        let embed_cell = record.get_any(&["embed", "Embed"]);
        let embed = render
            .embeds
            .admit(normalize_embed(embed_cell), clean_embed_value(embed_cell));

        let meta = [record.get("category"), record.collection()]
            .into_iter()
            .find(|v| !v.is_empty())
            .unwrap_or("")
            .to_string();

        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
            collection: record.collection().to_string(),
            meta,
            description: record.get("description").to_string(),
            preview: record.get("preview").to_string(),
            embed,
            links: parse_links(record.get("links")),
            tools: record.get("tools").to_string(),
            content: record.get("content").to_string(),
            images: image_sequence(record, &render.image_dir),
        }
    }
}

/// A gallery card linking to one post.
#[derive(Debug, Clone)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub preview: String,
    /// Thumbnail path, `None` when `image_main` is empty.
    pub thumbnail: Option<String>,
}

impl CardView {
    pub fn from_record(record: &Record, render: &RenderConfig) -> Self {
        let image_main = record.get("image_main").trim();
        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
            description: record.get("description").to_string(),
            preview: record.get("preview").to_string(),
            thumbnail: (!image_main.is_empty()).then(|| prefixed(&render.thumb_dir, image_main)),
        }
    }
}

/// Parse the `links` cell.
///
/// Entries are comma-separated. `label__url` gives a labelled link (extra
/// `__` segments are ignored); anything else is used as both label and URL.
/// Empty entries are skipped.
pub fn parse_links(cell: &str) -> Vec<Link> {
    cell.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            if entry.contains("__") {
                let mut parts = entry.split("__").map(str::trim);
                let label = parts.next().unwrap_or_default();
                let url = parts.next().unwrap_or_default();
                let label = if label.is_empty() { url } else { label };
                (!url.is_empty()).then(|| Link {
                    label: label.to_string(),
                    url: url.to_string(),
                })
            } else {
                Some(Link {
                    label: entry.to_string(),
                    url: entry.to_string(),
                })
            }
        })
        .collect()
}

/// `pic1..picN` with their captions, stopping at the first empty `picN`.
pub fn image_sequence(record: &Record, image_dir: &str) -> Vec<PostImage> {
    (1..)
        .map_while(|n| {
            let pic = record.get(&format!("pic{n}"));
            if pic.is_empty() {
                return None;
            }
            let caption = record.get(&format!("cap{n}"));
            Some(PostImage {
                number: n,
                src: prefixed(image_dir, pic),
                caption: (!caption.is_empty()).then(|| caption.to_string()),
            })
        })
        .collect()
}

/// Join a directory prefix and a file name. Absolute URLs and rooted paths
/// are returned unchanged.
fn prefixed(dir: &str, file: &str) -> String {
    if file.starts_with("http://") || file.starts_with("https://") || file.starts_with('/') {
        file.to_string()
    } else {
        format!("{dir}{file}")
    }
}

/// Render the long-form `content` cell to HTML.
///
/// With `markdown`, the cell is Markdown, but authors type it in a
/// spreadsheet where a single newline is meant as a line break, so soft
/// breaks become `<br>`. Inline HTML passes through. Without it, the cell is
/// taken as HTML and only newlines are converted.
pub fn render_long_content(content: &str, markdown: bool) -> String {
    if !markdown {
        return content.replace('\n', "<br>");
    }
    let events = Parser::new(content).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut html = String::new();
    md_html::push_html(&mut html, events);
    html
}
