//! Embed cell normalization.
//!
//! The `embed` column holds whatever the author pasted: a YouTube link, a
//! full `<iframe>` snippet copied from some site, a bare URL to a sketch or
//! pen, or arbitrary HTML. [`normalize_embed`] sorts the cell into an
//! [`EmbedDirective`] so the renderer can emit one clean iframe regardless of
//! how the value was written.
//!
//! Checks run in a fixed order and the first hit wins:
//!
//! | Input contains | Directive |
//! |----------------|-----------|
//! | `youtube.com` / `youtu.be` | `YouTube(id)`, or `None` if no id is found |
//! | `<iframe` | `RawIframeSrc(src)`, or `RawHtml` if `src` can't be read |
//! | starts with `http(s)://` | `DirectUrl` |
//! | any `<` | `RawHtml` |
//! | otherwise | `None` |

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]+)")
        .expect("valid youtube pattern")
});
static QUOTED_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src\s*=\s*["']([^"']+)["']"#).expect("valid quoted src pattern")
});
static BARE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)src\s*=\s*([^\s>]+)").expect("valid bare src pattern"));
static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid url pattern"));

/// How a post's embedded media should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedDirective {
    /// A YouTube video id, rendered through the `youtube.com/embed/` player.
    YouTube(String),
    /// The `src` pulled out of a pasted `<iframe>`.
    RawIframeSrc(String),
    /// A bare URL to load in an iframe.
    DirectUrl(String),
    /// Markup passed through untouched.
    RawHtml(String),
    None,
}

impl EmbedDirective {
    /// URL to put in a rebuilt `<iframe src>`, if this directive has one.
    pub fn iframe_src(&self) -> Option<String> {
        match self {
            EmbedDirective::YouTube(id) => Some(format!("https://www.youtube.com/embed/{id}")),
            EmbedDirective::RawIframeSrc(src) | EmbedDirective::DirectUrl(src) => {
                Some(src.clone())
            }
            EmbedDirective::RawHtml(_) | EmbedDirective::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, EmbedDirective::None)
    }
}

/// Which embed kinds a renderer is willing to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedSupport {
    /// Every directive kind.
    #[default]
    Full,
    /// YouTube and raw HTML only. Pasted iframes are passed through as
    /// markup and bare URLs are dropped.
    Basic,
}

impl EmbedSupport {
    /// Restrict `directive` to what this level supports. `original` is the
    /// cleaned cell value, used when an iframe falls back to raw markup.
    pub fn admit(self, directive: EmbedDirective, original: &str) -> EmbedDirective {
        match (self, directive) {
            (EmbedSupport::Full, d) => d,
            (EmbedSupport::Basic, EmbedDirective::RawIframeSrc(_)) => {
                EmbedDirective::RawHtml(original.to_string())
            }
            (EmbedSupport::Basic, EmbedDirective::DirectUrl(_)) => EmbedDirective::None,
            (EmbedSupport::Basic, d) => d,
        }
    }
}

/// Trim the cell and drop one leading and one trailing quote character.
pub fn clean_embed_value(raw: &str) -> &str {
    let value = raw.trim();
    let value = value
        .strip_prefix(['"', '\''])
        .unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// Classify an embed cell.
pub fn normalize_embed(raw: &str) -> EmbedDirective {
    let value = clean_embed_value(raw);
    if value.is_empty() {
        return EmbedDirective::None;
    }

    if value.contains("youtube.com") || value.contains("youtu.be") {
        return YOUTUBE_ID
            .captures(value)
            .map(|c| EmbedDirective::YouTube(c[1].to_string()))
            .unwrap_or(EmbedDirective::None);
    }

    if value.contains("<iframe") {
        let src = QUOTED_SRC
            .captures(value)
            .or_else(|| BARE_SRC.captures(value))
            .map(|c| c[1].to_string());
        return match src {
            Some(src) => EmbedDirective::RawIframeSrc(src),
            None => EmbedDirective::RawHtml(value.to_string()),
        };
    }

    if HTTP_URL.is_match(value) {
        return EmbedDirective::DirectUrl(value.to_string());
    }

    if value.contains('<') {
        return EmbedDirective::RawHtml(value.to_string());
    }

    EmbedDirective::None
}
