//! HTML site generation.
//!
//! Renders the views from [`crate::page`] to HTML and writes the static site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): collection list and an "Explore randomly"
//!   link drawn from the weighted lottery at build time
//! - **Gallery pages** (`/gallery/{collection}.html`): one card per visible row
//! - **Post pages** (`/post/{id}.html`): full post with previous/next arrows
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── gallery/
//! │   ├── art.html
//! │   └── fashion.html
//! └── post/
//!     ├── alpha.html
//!     └── beta.html
//! ```
//!
//! Image files are not copied; `render.image_dir` and `render.thumb_dir` are
//! emitted as link prefixes relative to the site root.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Sheet text is escaped, with two exceptions the author opts into: the
//! Markdown `content` cell and raw-HTML embeds.

use crate::config::{self, SiteConfig};
use crate::content::{self, CardView, PostView};
use crate::embed::EmbedDirective;
use crate::loader::{LoadError, Loader, Transport};
use crate::page::{self, GalleryView, NavTarget, PageError, PostPage, Request, Route};
use crate::select;
use crate::types::RecordSequence;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Attributes every rebuilt iframe carries.
const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// What a build wrote.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// `(collection, title, item count)` in first-appearance order.
    pub galleries: Vec<(String, String, usize)>,
    /// `(id, title)` in sheet order.
    pub posts: Vec<(String, String)>,
    /// Ids or collections that could not be written, with the reason.
    pub skipped: Vec<String>,
    /// Post the index page's random link points at.
    pub random: Option<String>,
}

/// A rendered page plus the error it shows, if it is an error page.
pub struct RenderedPage {
    pub markup: Markup,
    pub error: Option<PageError>,
}

/// CSS shared by every page: theme variables followed by the static sheet.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}",
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

/// Render the page for one request.
///
/// Failures (load errors, missing parameters, unknown ids) become an error
/// page rather than an `Err`, so the caller always has something to show.
pub fn render_route<T: Transport>(
    loader: &Loader<T>,
    request: &Request,
    config: &SiteConfig,
) -> RenderedPage {
    let css = site_css(config);
    let result = loader
        .load()
        .map_err(PageError::from)
        .and_then(|records| render_route_page(records, request, config, &css));

    match result {
        Ok(markup) => RenderedPage {
            markup,
            error: None,
        },
        Err(err) => {
            warn!(?request, error = %err, "rendering error page");
            RenderedPage {
                markup: render_error_page(&err, config, &css, request.root),
                error: Some(err),
            }
        }
    }
}

fn render_route_page(
    records: &RecordSequence,
    request: &Request,
    config: &SiteConfig,
    css: &str,
) -> Result<Markup, PageError> {
    let root = request.root;
    Ok(match &request.route {
        Route::Home => render_index(records, page::random(records).ok().as_deref(), config, css),
        Route::Gallery(collection) => {
            let view = page::gallery(records, collection.as_deref(), config)?;
            render_gallery_page(&view, config, css, root)
        }
        Route::Post(id) => {
            let post = page::post(records, id.as_deref(), config)?;
            render_post_page(&post, config, css, root)
        }
    })
}

/// Build the whole site into `output_dir`.
///
/// Fetches the sheet once through `loader`. Rows whose id (or collections
/// whose name) is not a safe file name are skipped and reported.
pub fn build<T: Transport>(
    loader: &Loader<T>,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<BuildSummary, GenerateError> {
    let records = loader.load()?;
    let css = site_css(config);
    let mut summary = BuildSummary::default();

    fs::create_dir_all(output_dir.join("gallery"))?;
    fs::create_dir_all(output_dir.join("post"))?;

    // Galleries
    for collection in select::collections(records) {
        if !page::is_path_safe(collection) {
            warn!(collection, "skipping collection with unsafe name");
            summary
                .skipped
                .push(format!("collection {collection:?}: not a safe file name"));
            continue;
        }
        let view = match page::gallery(records, Some(collection), config) {
            Ok(view) => view,
            Err(err) => {
                warn!(collection, error = %err, "skipping collection");
                summary.skipped.push(format!("collection {collection:?}: {err}"));
                continue;
            }
        };
        let request = Request::from(Route::Gallery(Some(view.collection.clone())));
        let html = render_gallery_page(&view, config, &css, request.root);
        write_page(output_dir, &request.route, html)?;
        summary
            .galleries
            .push((view.collection, view.title, view.cards.len()));
    }

    // Posts
    let published = page::publishable(records);
    let mut seen = HashSet::new();
    for record in select::filter_visible(records, None) {
        let id = record.id();
        if !page::is_path_safe(id) {
            warn!(id, "skipping post with unsafe id");
            summary.skipped.push(format!("post {id:?}: not a safe file name"));
        } else if !seen.insert(id) {
            warn!(id, "duplicate visible id; first row wins");
            summary.skipped.push(format!("post {id:?}: duplicate id"));
        }
    }
    for record in published {
        let id = record.id();
        let post = match page::post(records, Some(id), config) {
            Ok(post) => post,
            Err(err) => {
                summary.skipped.push(format!("post {id:?}: {err}"));
                continue;
            }
        };
        let request = Request::from(Route::Post(Some(id.to_string())));
        let html = render_post_page(&post, config, &css, request.root);
        write_page(output_dir, &request.route, html)?;
        summary.posts.push((id.to_string(), post.post.title));
    }

    summary.random = page::random(records).ok();
    let index = render_index(records, summary.random.as_deref(), config, &css);
    write_page(output_dir, &Route::Home, index)?;

    info!(
        galleries = summary.galleries.len(),
        posts = summary.posts.len(),
        skipped = summary.skipped.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(summary)
}

/// Write `markup` to the route's static path under `output_dir`.
fn write_page(output_dir: &Path, route: &Route, markup: Markup) -> Result<(), GenerateError> {
    if let Some(rel) = route.path() {
        fs::write(output_dir.join(rel), markup.into_string())?;
    }
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with its breadcrumb
fn site_header(config: &SiteConfig, root: &str, breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            a.site-title href={ (root) "index.html" } { (config.site.title) }
            nav.breadcrumb { (breadcrumb) }
        }
    }
}

fn post_href(root: &str, id: &str) -> String {
    format!("{root}post/{id}.html")
}

fn gallery_href(root: &str, collection: &str) -> String {
    format!("{root}gallery/{collection}.html")
}

/// Renders an embed directive as a clean iframe, or raw markup
pub fn render_embed(embed: &EmbedDirective) -> Markup {
    html! {
        @match embed {
            EmbedDirective::RawHtml(markup) => {
                div.post-embed { (PreEscaped(markup)) }
            }
            EmbedDirective::None => {}
            other => {
                @if let Some(src) = other.iframe_src() {
                    div.post-embed {
                        iframe src=(src) frameborder="0" allowfullscreen allow=(IFRAME_ALLOW) {}
                    }
                }
            }
        }
    }
}

/// Renders one gallery card
fn render_card(card: &CardView, root: &str) -> Markup {
    html! {
        a.gallery-card href=(post_href(root, &card.id)) {
            div.gallery-card-image {
                @if let Some(thumb) = &card.thumbnail {
                    img src={ (root) (thumb) } alt=(card.title) loading="lazy";
                } @else {
                    p { "No image specified" }
                }
            }
            div.gallery-card-content {
                h3.gallery-card-title { (card.title) }
                @if !card.description.is_empty() {
                    p.gallery-card-description { (card.description) }
                }
                @if !card.preview.is_empty() {
                    p.gallery-card-preview { (card.preview) }
                }
            }
        }
    }
}

/// Renders the body of a post
fn render_post_body(post: &PostView, root: &str, markdown: bool) -> Markup {
    html! {
        @if !post.description.is_empty() {
            p.post-description { (post.description) }
        }
        @if !post.preview.is_empty() {
            p.post-preview { (post.preview) }
        }
        (render_embed(&post.embed))
        @if !post.links.is_empty() {
            div.post-links {
                @for link in &post.links {
                    a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.label) }
                }
            }
        }
        @if !post.tools.is_empty() {
            div.post-tools {
                h3 { "Tools Used" }
                p { (post.tools) }
            }
        }
        @if !post.content.is_empty() {
            div.post-long-content { (PreEscaped(content::render_long_content(&post.content, markdown))) }
        }
        @for image in &post.images {
            figure.post-figure {
                img.post-image src={ (root) (image.src) } alt={ "Project Image " (image.number) } loading="lazy";
                @if let Some(caption) = &image.caption {
                    figcaption.post-caption { (caption) }
                }
            }
        }
    }
}

fn render_nav_arrow(root: &str, target: &NavTarget, label: &str, arrow: &str, rel: &str) -> Markup {
    html! {
        a class={ "post-nav post-nav-" (rel) } rel=(rel) href=(post_href(root, &target.id)) {
            span.post-nav-arrow { (arrow) }
            span.post-nav-text {
                span.post-nav-label { (label) }
                span.post-nav-title { (target.title) }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the homepage: collections and a random pick
fn render_index(
    records: &RecordSequence,
    random: Option<&str>,
    config: &SiteConfig,
    css: &str,
) -> Markup {
    let collections = page::collections(records);

    let content = html! {
        (site_header(config, "", html! { "Home" }))
        main.index-page {
            ul.collection-list {
                @for (collection, count) in &collections {
                    li {
                        a href=(gallery_href("", collection)) {
                            span.collection-title { (config.collection_title(collection)) }
                            span.collection-count { (count) }
                        }
                    }
                }
            }
            @if let Some(id) = random {
                p.random-explore {
                    a href=(post_href("", id)) { "Explore randomly" }
                }
            }
        }
    };

    base_document(&config.page_title(""), css, Some("index"), content)
}

/// Renders a collection gallery
fn render_gallery_page(view: &GalleryView, config: &SiteConfig, css: &str, root: &str) -> Markup {
    let breadcrumb = html! {
        a href={ (root) "index.html" } { "Home" }
        " › "
        (view.title)
    };

    let content = html! {
        (site_header(config, root, breadcrumb))
        main.gallery-page {
            h1.collection-title { (view.title) }
            div.gallery-grid {
                @for card in &view.cards {
                    (render_card(card, root))
                }
            }
        }
    };

    base_document(&config.page_title(&view.title), css, Some("gallery"), content)
}

/// Renders a post with its prev/next arrows
fn render_post_page(page: &PostPage, config: &SiteConfig, css: &str, root: &str) -> Markup {
    let post = &page.post;
    let back = page::is_path_safe(&post.collection)
        .then(|| gallery_href(root, &post.collection));
    let (prev, next) = (page.prev.as_ref(), page.next.as_ref());

    let breadcrumb = html! {
        a href={ (root) "index.html" } { "Home" }
        @if let Some(href) = &back {
            " › "
            a id="backToGallery" href=(href) { (config.collection_title(&post.collection)) }
        }
    };

    let content = html! {
        (site_header(config, root, breadcrumb))
        main.post-page {
            article.post-content {
                header.post-header {
                    h1.post-title { (post.title) }
                    div.post-meta { (post.meta) }
                }
                div.post-main {
                    (render_post_body(post, root, config.render.markdown_content))
                }
            }
            @if prev.is_some() || next.is_some() {
                nav.post-navigation {
                    @if let Some(prev) = prev {
                        (render_nav_arrow(root, prev, "Previous", "←", "prev"))
                    }
                    @if let Some(next) = next {
                        (render_nav_arrow(root, next, "Next", "→", "next"))
                    }
                }
            }
        }
    };

    base_document(&config.page_title(&post.title), css, Some("post"), content)
}

/// Renders the error state for a failed request
fn render_error_page(err: &PageError, config: &SiteConfig, css: &str, root: &str) -> Markup {
    let content = html! {
        (site_header(config, root, html! { a href={ (root) "index.html" } { "Home" } }))
        main.error-page {
            div.error-state id="errorState" {
                p { (err.user_message()) }
            }
        }
    };

    base_document(&config.page_title(""), css, Some("error"), content)
}

// ============================================================================
// Tests
// ============================================================================
