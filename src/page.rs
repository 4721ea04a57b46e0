//! Page requests: which page was asked for, and what it should show.
//!
//! Pages are addressed the way the published site links them:
//!
//! ```text
//! index.html                     → Home
//! post.html?id=alpha             → Post(alpha)       (query form)
//! post/alpha.html                → Post(alpha)       (static form)
//! gallery.html?collection=art    → Gallery(art)
//! gallery/art.html               → Gallery(art)
//! ```
//!
//! Resolution turns a request plus the loaded records into a view or a
//! [`PageError`]. Every failure is a value the renderer shows as an error
//! page; nothing here panics on bad input.

use crate::config::SiteConfig;
use crate::content::{CardView, PostView};
use crate::loader::LoadError;
use crate::select::{self, Neighbors};
use crate::types::{Record, RecordSequence};
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

static BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("valid base url"));

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to load data: {0}")]
    Load(#[from] LoadError),
    #[error("No post ID specified")]
    MissingPostId,
    #[error("No collection specified")]
    MissingCollection,
    #[error("Post not found: {0}")]
    PostNotFound(String),
    #[error("No items found in collection: {0}")]
    EmptyCollection(String),
    #[error("No visible posts to pick from")]
    NothingToPick,
}

/// The three ways a page request can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    NotFound,
    MissingParameter,
}

impl PageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PageError::Load(_) => ErrorKind::NetworkFailure,
            PageError::MissingPostId | PageError::MissingCollection => {
                ErrorKind::MissingParameter
            }
            PageError::PostNotFound(_)
            | PageError::EmptyCollection(_)
            | PageError::NothingToPick => ErrorKind::NotFound,
        }
    }

    /// Short message for the error page. Load failures hide the source URL.
    pub fn user_message(&self) -> String {
        match self {
            PageError::Load(_) => "Failed to load data".to_string(),
            PageError::PostNotFound(_) => "Post not found".to_string(),
            PageError::EmptyCollection(_) => "No items found".to_string(),
            other => other.to_string(),
        }
    }
}

/// A page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Gallery(Option<String>),
    Post(Option<String>),
}

impl Route {
    /// Parse a site-relative URL such as `post.html?id=alpha`.
    ///
    /// Unrecognized paths are the homepage. Empty query values count as
    /// missing.
    pub fn parse(input: &str) -> Route {
        Request::parse(input).route
    }

    /// Static-site path for this route, relative to the site root.
    pub fn path(&self) -> Option<String> {
        match self {
            Route::Home => Some("index.html".to_string()),
            Route::Gallery(Some(c)) => Some(format!("gallery/{c}.html")),
            Route::Post(Some(id)) => Some(format!("post/{id}.html")),
            Route::Gallery(None) | Route::Post(None) => None,
        }
    }
}

/// A page request: the route, plus the relative prefix from the requested
/// page back to the site root. Links on the rendered page start with `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub route: Route,
    pub root: &'static str,
}

impl Request {
    /// Parse a site-relative URL. Query forms (`post.html?id=`) sit at the
    /// site root; static forms (`post/alpha.html`) sit one directory down.
    pub fn parse(input: &str) -> Request {
        let Ok(url) = BASE.join(input.trim()) else {
            return Route::Home.into();
        };
        let query = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .filter(|v| !v.is_empty())
        };
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let (route, root) = match segments.as_slice() {
            [.., "post.html"] => (Route::Post(query("id")), ""),
            [.., "gallery.html"] => (Route::Gallery(query("collection")), ""),
            [.., "post", file] => (Route::Post(html_stem(file)), "../"),
            [.., "gallery", file] => (Route::Gallery(html_stem(file)), "../"),
            _ => (Route::Home, ""),
        };
        Request { route, root }
    }
}

/// A route requested at its static-site location ([`Route::path`]).
impl From<Route> for Request {
    fn from(route: Route) -> Self {
        let root = if route == Route::Home { "" } else { "../" };
        Request { route, root }
    }
}

/// `name` from `name.html`, percent-decoded like query values are.
fn html_stem(file: &str) -> Option<String> {
    let stem = file.strip_suffix(".html").filter(|s| !s.is_empty())?;
    Some(
        urlencoding::decode(stem)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| stem.to_string()),
    )
}

/// Whether a value can be used verbatim as a file name in the static site.
pub fn is_path_safe(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('.')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Visible records that get a page of their own: the id is a safe file
/// name, and only the first row of a repeated id counts. Sheet order.
///
/// Gallery cards, prev/next arrows, and the random pick only ever point at
/// these, so every link in the site has a page behind it.
pub fn publishable(records: &RecordSequence) -> Vec<&Record> {
    let mut seen = HashSet::new();
    select::filter_visible(records, None)
        .into_iter()
        .filter(|r| is_path_safe(r.id()) && seen.insert(r.id()))
        .collect()
}

/// Collections with at least one publishable post and a safe name, with
/// their post counts, in first-appearance order.
pub fn collections(records: &RecordSequence) -> Vec<(&str, usize)> {
    let published = publishable(records);
    select::collections(published.iter().copied())
        .into_iter()
        .filter(|c| is_path_safe(c))
        .map(|c| (c, select::filter_visible(published.iter().copied(), Some(c)).len()))
        .collect()
}

// ============================================================================
// Views
// ============================================================================

/// A collection's gallery.
#[derive(Debug, Clone)]
pub struct GalleryView {
    pub collection: String,
    pub title: String,
    pub cards: Vec<CardView>,
}

/// Minimal description of a neighbouring post for the prev/next arrows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTarget {
    pub id: String,
    pub title: String,
}

impl NavTarget {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
        }
    }
}

/// A post plus its navigation context.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub post: PostView,
    pub prev: Option<NavTarget>,
    pub next: Option<NavTarget>,
}

/// Resolve a gallery request.
///
/// A missing collection argument is a different failure from a collection
/// with nothing visible in it.
pub fn gallery(
    records: &RecordSequence,
    collection: Option<&str>,
    config: &SiteConfig,
) -> Result<GalleryView, PageError> {
    let collection = collection.ok_or(PageError::MissingCollection)?;
    let items = select::filter_visible(publishable(records), Some(collection));
    if items.is_empty() {
        return Err(PageError::EmptyCollection(collection.to_string()));
    }
    Ok(GalleryView {
        collection: collection.to_string(),
        title: config.collection_title(collection),
        cards: items
            .into_iter()
            .map(|r| CardView::from_record(r, &config.render))
            .collect(),
    })
}

/// Resolve a post request.
///
/// With `render.visible_posts_only`, hidden rows do not resolve. Prev/next
/// come from the [`publishable`] rows in sheet order when
/// `render.post_navigation` is on.
pub fn post(
    records: &RecordSequence,
    id: Option<&str>,
    config: &SiteConfig,
) -> Result<PostPage, PageError> {
    let id = id.ok_or(PageError::MissingPostId)?;

    let found = if config.render.visible_posts_only {
        select::resolve_visible(records, id)
    } else {
        select::resolve(records, id)
    };
    let record = found.ok_or_else(|| PageError::PostNotFound(id.to_string()))?;

    let Neighbors { prev, next } = if config.render.post_navigation {
        select::neighbors(&publishable(records), id)
    } else {
        Neighbors::default()
    };

    Ok(PostPage {
        post: PostView::from_record(record, &config.render),
        prev: prev.map(NavTarget::from_record),
        next: next.map(NavTarget::from_record),
    })
}

/// Weighted-random [`publishable`] post id.
pub fn random(records: &RecordSequence) -> Result<String, PageError> {
    select::pick_weighted(publishable(records)).ok_or(PageError::NothingToPick)
}
