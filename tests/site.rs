//! End-to-end site tests: build the fixture sheet into a temp directory and
//! inspect the generated HTML.
//!
//! Run with: `cargo test --test site`

use sheetfolio::config::SiteConfig;
use sheetfolio::generate::{self, BuildSummary};
use sheetfolio::loader::{FileTransport, LoadError, Loader};
use sheetfolio::page::{PageError, Request, Route};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

// ===========================================================================
// Setup helpers
// ===========================================================================

fn fixture_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/portfolio.csv")
}

fn fixture_loader() -> Loader<FileTransport> {
    Loader::new(FileTransport::new(fixture_csv()))
}

fn build_fixture() -> (TempDir, BuildSummary) {
    let dir = TempDir::new().unwrap();
    let summary = generate::build(&fixture_loader(), &SiteConfig::default(), dir.path()).unwrap();
    (dir, summary)
}

fn read(dir: &Path, rel: &str) -> String {
    std::fs::read_to_string(dir.join(rel))
        .unwrap_or_else(|e| panic!("could not read {rel}: {e}"))
}

// ===========================================================================
// Build output
// ===========================================================================

#[test]
fn build_writes_every_page() {
    let (dir, summary) = build_fixture();
    let root = dir.path();

    assert!(root.join("index.html").exists());
    for collection in ["art", "data", "fashion"] {
        assert!(
            root.join(format!("gallery/{collection}.html")).exists(),
            "{collection}"
        );
    }
    for id in ["tidal-forms", "night-market", "flow-field", "pitch-deck", "linen-capsule"] {
        assert!(root.join(format!("post/{id}.html")).exists(), "{id}");
    }
    assert_eq!(summary.galleries.len(), 3);
    assert_eq!(summary.posts.len(), 5);
}

#[test]
fn hidden_rows_are_not_published() {
    let (dir, _) = build_fixture();
    assert!(!dir.path().join("post/draft-study.html").exists());

    let art = read(dir.path(), "gallery/art.html");
    assert!(art.contains("Tidal Forms"));
    assert!(!art.contains("Draft Study"));
}

#[test]
fn unsafe_ids_are_skipped_and_reported() {
    let (dir, summary) = build_fixture();
    assert!(!dir.path().join("post/bad id.html").exists());
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].contains("bad id"));

    // linen-capsule's only later neighbour has no page, so no next arrow.
    let linen = read(dir.path(), "post/linen-capsule.html");
    assert!(linen.contains(r#"href="../post/pitch-deck.html""#));
    assert!(!linen.contains(r#"rel="next""#));
}

#[test]
fn post_pages_link_neighbours_in_sheet_order() {
    let (dir, _) = build_fixture();
    let html = read(dir.path(), "post/night-market.html");

    // draft-study sits between these rows but is hidden.
    assert!(html.contains(r#"href="../post/tidal-forms.html""#));
    assert!(html.contains(r#"href="../post/flow-field.html""#));
    assert!(html.contains(r#"href="../gallery/art.html""#));
}

#[test]
fn embeds_are_normalized() {
    let (dir, _) = build_fixture();

    let tidal = read(dir.path(), "post/tidal-forms.html");
    assert!(tidal.contains(r#"src="https://www.youtube.com/embed/Qx7pLm2Ab_c""#));

    let market = read(dir.path(), "post/night-market.html");
    assert!(market.contains(r#"src="https://player.vimeo.com/video/76979871""#));

    let flow = read(dir.path(), "post/flow-field.html");
    assert!(flow.contains(r#"src="https://editor.p5js.org/someone/full/abc123""#));

    let deck = read(dir.path(), "post/pitch-deck.html");
    assert!(deck.contains("<blockquote class=embed>Slides</blockquote>"));
}

#[test]
fn post_page_content() {
    let (dir, _) = build_fixture();
    let html = read(dir.path(), "post/tidal-forms.html");

    assert!(html.contains("Ink studies of shoreline erosion, 2023"));
    assert!(html.contains(r#"href="https://notes.example/tidal""#));
    assert!(html.contains(">Process notes</a>"));
    assert!(html.contains(r#"rel="noopener noreferrer""#));
    assert!(html.contains("Procreate"));
    assert!(html.contains(r#"src="../images/tidal-1.jpg""#));
    assert!(html.contains("Panel four"));
    assert!(html.contains("Illustration"));
}

#[test]
fn index_links_collections_and_a_random_post() {
    let (dir, summary) = build_fixture();
    let index = read(dir.path(), "index.html");

    assert!(index.contains(r#"href="gallery/art.html""#));
    assert!(index.contains("DATA &amp; DECKS"));

    // pitch-deck has weight 0 and never wins.
    let random = summary.random.expect("fixture has eligible posts");
    assert_ne!(random, "pitch-deck");
    assert!(index.contains(&format!(r#"href="post/{random}.html""#)));
}

#[test]
fn gallery_cards_use_thumbnails() {
    let (dir, _) = build_fixture();
    let fashion = read(dir.path(), "gallery/fashion.html");
    assert!(fashion.contains(r#"src="../images/thumb/linen-cover.jpg""#));
    assert!(fashion.contains("FASHION WORK"));
}

/// Every `../post/*.html` and `../gallery/*.html` href on the page.
fn relative_links(html: &str) -> Vec<String> {
    let re = Regex::new(r#"href="\.\./((?:post|gallery)/[^"]+\.html)""#).unwrap();
    re.captures_iter(html).map(|c| c[1].to_string()).collect()
}

#[test]
fn every_internal_link_has_a_page() {
    let (dir, summary) = build_fixture();
    let mut pages: Vec<String> = summary
        .galleries
        .iter()
        .map(|(collection, _, _)| format!("gallery/{collection}.html"))
        .collect();
    pages.extend(summary.posts.iter().map(|(id, _)| format!("post/{id}.html")));

    let mut checked = 0;
    for page in &pages {
        for link in relative_links(&read(dir.path(), page)) {
            assert!(dir.path().join(&link).exists(), "{page} links missing {link}");
            checked += 1;
        }
    }
    assert!(checked > 0);
}

#[test]
fn gallery_counts_match_written_posts() {
    let (dir, summary) = build_fixture();
    let fashion = summary
        .galleries
        .iter()
        .find(|(collection, _, _)| collection == "fashion")
        .unwrap();
    assert_eq!(fashion.2, 1);
    assert!(!read(dir.path(), "gallery/fashion.html").contains("Spaced Id"));
}

// ===========================================================================
// render_route
// ===========================================================================

#[test]
fn render_route_reuses_one_load() {
    let loader = fixture_loader();
    let config = SiteConfig::default();

    let post = generate::render_route(&loader, &Request::parse("post.html?id=flow-field"), &config);
    assert!(post.error.is_none());
    assert!(loader.is_loaded());

    let gallery = generate::render_route(&loader, &Request::parse("gallery/data.html"), &config);
    assert!(gallery.markup.into_string().contains("Pitch Deck"));
}

#[test]
fn static_url_render_matches_built_page() {
    let (dir, _) = build_fixture();
    let rendered = generate::render_route(
        &fixture_loader(),
        &Request::parse("post/night-market.html"),
        &SiteConfig::default(),
    );
    assert_eq!(
        rendered.markup.into_string(),
        read(dir.path(), "post/night-market.html")
    );
}

#[test]
fn rendered_home_random_link_has_a_page() {
    let (dir, _) = build_fixture();
    let home = generate::render_route(
        &fixture_loader(),
        &Request::from(Route::Home),
        &SiteConfig::default(),
    )
    .markup
    .into_string();
    let re = Regex::new(r#"href="(post/[^"]+\.html)""#).unwrap();
    let link = &re.captures(&home).expect("random link")[1];
    assert!(dir.path().join(link).exists(), "{link}");
}

#[test]
fn render_route_missing_file_is_load_error() {
    let loader = Loader::new(FileTransport::new("/nonexistent/sheet.csv"));
    let page = generate::render_route(&loader, &Request::from(Route::Home), &SiteConfig::default());
    assert!(matches!(
        page.error,
        Some(PageError::Load(LoadError::Io { .. }))
    ));
}

// ===========================================================================
// CLI
// ===========================================================================

fn sheetfolio(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sheetfolio"))
        .args(args)
        .output()
        .expect("failed to run sheetfolio")
}

#[test]
fn cli_build_with_local_csv() {
    let dir = TempDir::new().unwrap();
    let out = sheetfolio(&[
        "build",
        "--csv",
        fixture_csv().to_str().unwrap(),
        "--config",
        dir.path().to_str().unwrap(),
        "--output",
        dir.path().join("dist").to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Generated 3 galleries, 5 posts"));
    assert!(dir.path().join("dist/post/tidal-forms.html").exists());
}

#[test]
fn cli_check_prints_inventory() {
    let dir = TempDir::new().unwrap();
    let out = sheetfolio(&[
        "check",
        "--csv",
        fixture_csv().to_str().unwrap(),
        "--config",
        dir.path().to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("001 ART & DESIGN (2 posts)"));
    assert!(stdout.contains("    draft-study (Draft Study)"));
}

#[test]
fn cli_render_missing_post_fails() {
    let dir = TempDir::new().unwrap();
    let out = sheetfolio(&[
        "render",
        "post.html?id=draft-study",
        "--csv",
        fixture_csv().to_str().unwrap(),
        "--config",
        dir.path().to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Post not found"));
}

#[test]
fn cli_without_source_url_explains() {
    let dir = TempDir::new().unwrap();
    let out = sheetfolio(&["check", "--config", dir.path().to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("source.url is not set"));
}

#[test]
fn cli_gen_config_prints_stock_file() {
    let out = sheetfolio(&["gen-config"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("[source]"));
}
