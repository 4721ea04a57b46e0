//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user file is merged on top, so a config
//! file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [source]
//! url = ""                  # Published CSV export of the sheet
//! # timeout_secs = 30       # Request timeout; omit to wait indefinitely
//!
//! [site]
//! title = "Portfolio"       # Prefix for every page <title>
//!
//! [render]
//! image_dir = "images/"         # Prefix for pic1..picN
//! thumb_dir = "images/thumb/"   # Prefix for image_main on gallery cards
//! embeds = "full"               # "full" or "basic" (YouTube + raw HTML only)
//! post_navigation = true        # Previous/next arrows on post pages
//! visible_posts_only = true     # Hidden rows 404 on post pages
//!
//! [collections]             # Display titles; unknown collections are upper-cased
//! art = "ART & DESIGN"
//!
//! [theme]
//! background = "#fdfcf9"
//! text = "#1b1b1b"
//! text_muted = "#6b6b6b"
//! accent = "#b3472d"
//! ```
//!
//! Unknown keys are rejected to catch typos early, except under
//! `[collections]`, which is an open map.

use crate::embed::EmbedSupport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where the sheet is fetched from.
    pub source: SourceConfig,
    /// Site-wide text.
    pub site: SiteMeta,
    /// Field interpretation and page options.
    pub render: RenderConfig,
    /// Display titles for collection keys.
    pub collections: BTreeMap<String, String>,
    /// CSS colors.
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            site: SiteMeta::default(),
            render: RenderConfig::default(),
            collections: default_collections(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.source.url.is_empty() && url::Url::parse(&self.source.url).is_err() {
            return Err(ConfigError::Validation(format!(
                "source.url is not a valid URL: {}",
                self.source.url
            )));
        }
        if self.source.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.render.image_dir.contains("..") || self.render.thumb_dir.contains("..") {
            return Err(ConfigError::Validation(
                "render.image_dir and render.thumb_dir must not contain '..'".into(),
            ));
        }
        Ok(())
    }

    /// Display title for a collection key.
    pub fn collection_title(&self, collection: &str) -> String {
        self.collections
            .get(collection)
            .cloned()
            .unwrap_or_else(|| collection.to_uppercase())
    }

    /// `<title>` text for a page: `"{site title} - {page}"`.
    pub fn page_title(&self, page: &str) -> String {
        if page.is_empty() {
            self.site.title.clone()
        } else {
            format!("{} - {}", self.site.title, page)
        }
    }
}

/// Sheet location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Published CSV URL (`.../pub?output=csv`).
    pub url: String,
    /// Request timeout in seconds. `None` waits for as long as the server does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl SourceConfig {
    /// The URL, or an error telling the user how to provide one.
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        if self.url.is_empty() {
            Err(ConfigError::Validation(
                "source.url is not set; add it to config.toml or pass --csv <file>".into(),
            ))
        } else {
            Ok(&self.url)
        }
    }
}

/// Site-wide text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Prefix for every page title.
    pub title: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
        }
    }
}

/// Page rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Path prefix for post images (`pic1..picN`).
    pub image_dir: String,
    /// Path prefix for gallery card thumbnails (`image_main`).
    pub thumb_dir: String,
    /// Which embed kinds post pages render.
    pub embeds: EmbedSupport,
    /// Show previous/next arrows on post pages.
    pub post_navigation: bool,
    /// Only visible rows resolve on post pages.
    pub visible_posts_only: bool,
    /// Render the `content` cell as Markdown. Off passes it through as HTML
    /// with line breaks turned into `<br>`.
    pub markdown_content: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_dir: "images/".to_string(),
            thumb_dir: "images/thumb/".to_string(),
            embeds: EmbedSupport::Full,
            post_navigation: true,
            visible_posts_only: true,
            markdown_content: true,
        }
    }
}

/// Page colors, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub background: String,
    pub text: String,
    /// Meta lines, captions, navigation labels.
    pub text_muted: String,
    /// Links and the active navigation arrow.
    pub accent: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#fdfcf9".to_string(),
            text: "#1b1b1b".to_string(),
            text_muted: "#6b6b6b".to_string(),
            accent: "#b3472d".to_string(),
        }
    }
}

fn default_collections() -> BTreeMap<String, String> {
    [
        ("art", "ART & DESIGN"),
        ("fashion", "FASHION WORK"),
        ("writing", "WRITING"),
        ("data", "DATA & DECKS"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Collection titles are part of this base layer, so a user file can add or
/// rename single collections without restating the rest.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in `dir`, on top of stock defaults.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sheetfolio configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error (except under [collections]).

# ---------------------------------------------------------------------------
# Sheet source
# ---------------------------------------------------------------------------
[source]
# Published CSV export of the sheet (File > Share > Publish to web > CSV).
# Leave empty and pass --csv <file> to build from a local export instead.
url = ""

# Request timeout in seconds. Omit to wait for as long as the server does.
# timeout_secs = 30

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Prefix for every page title: "<title> - <page>".
title = "Portfolio"

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Path prefix for post images (pic1, pic2, ...).
image_dir = "images/"

# Path prefix for gallery card thumbnails (image_main).
thumb_dir = "images/thumb/"

# Embed kinds shown on post pages:
#   "full"  - YouTube, pasted iframes, bare URLs, raw HTML
#   "basic" - YouTube and raw HTML only
embeds = "full"

# Previous/next arrows on post pages, in sheet row order.
post_navigation = true

# Rows whose "show" column is not "y" cannot be opened as posts.
visible_posts_only = true

# Long-form "content" cells are Markdown. Set to false to pass them through
# as raw HTML with each line break turned into <br>.
markdown_content = true

# ---------------------------------------------------------------------------
# Collection titles (key = value of the "collection" column)
# Collections not listed here are shown upper-cased.
# ---------------------------------------------------------------------------
[collections]
art = "ART & DESIGN"
data = "DATA & DECKS"
fashion = "FASHION WORK"
writing = "WRITING"

# ---------------------------------------------------------------------------
# Theme colors
# ---------------------------------------------------------------------------
[theme]
background = "#fdfcf9"
text = "#1b1b1b"
text_muted = "#6b6b6b"    # Meta lines, captions, navigation labels
accent = "#b3472d"        # Links, navigation arrows
"##
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
}}"#,
        background = theme.background,
        text = theme.text,
        text_muted = theme.text_muted,
        accent = theme.accent,
    )
}
