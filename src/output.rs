//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is a content inventory: every post is shown by its positional
//! index and title, with the sheet id and file paths as indented context
//! lines. This keeps the listing readable for the person who maintains the
//! sheet while still letting them trace a line back to a row.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Collections
//! 001 ART & DESIGN (3 posts)
//!     001 Alpha
//!         Id: alpha
//!         Weight: 1
//!     002 Beta
//!         Id: beta
//!         Description: Second, with comma
//!
//! Hidden
//!     hidden (Hidden)
//!
//! Lottery: 4 posts, 8 tickets
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 ART & DESIGN → gallery/art.html (3 posts)
//!
//! Posts
//! 001 Alpha → post/alpha.html
//!
//! Random pick: beta
//! Generated 1 gallery, 1 post
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::config::SiteConfig;
use crate::generate::BuildSummary;
use crate::select;
use crate::types::RecordSequence;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Format an entity header: positional index + title, with optional count.
///
/// ```text
/// 001 ART & DESIGN (3 posts)
/// 001 Alpha
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({})", format_index(index), title, plural(n, "post", "posts")),
        None => format!("{} {}", format_index(index), title),
    }
}

/// A post title, or its id in parens when the title cell is empty.
fn post_label(title: &str, id: &str) -> String {
    if title.is_empty() {
        format!("({id})")
    } else {
        title.to_string()
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Inventory of a loaded sheet: visible posts by collection, hidden rows,
/// and the lottery size.
pub fn format_records_output(records: &RecordSequence, config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Collections".to_string());
    for (ci, collection) in select::collections(records).into_iter().enumerate() {
        let items = select::filter_visible(records, Some(collection));
        lines.push(entity_header(
            ci + 1,
            &config.collection_title(collection),
            Some(items.len()),
        ));
        for (pi, record) in items.into_iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                entity_header(pi + 1, &post_label(record.title(), record.id()), None)
            ));
            lines.push(format!("{}Id: {}", indent(2), record.id()));
            let weight = select::weight(record);
            if weight != select::DEFAULT_WEIGHT {
                lines.push(format!("{}Weight: {}", indent(2), weight));
            }
            let description = record.get("description");
            if !description.is_empty() {
                lines.push(format!(
                    "{}Description: {}",
                    indent(2),
                    truncate_desc(description, 60)
                ));
            }
        }
    }

    let unassigned: Vec<_> = select::filter_visible(records, Some(""));
    if !unassigned.is_empty() {
        lines.push(String::new());
        lines.push("No collection".to_string());
        for record in unassigned {
            lines.push(format!(
                "{}{}",
                indent(1),
                post_label(record.title(), record.id())
            ));
        }
    }

    let hidden: Vec<_> = records.iter().filter(|r| !select::is_visible(r)).collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Hidden".to_string());
        for record in hidden {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                record.id(),
                post_label(record.title(), record.id())
            ));
        }
    }

    let pool = select::LotteryPool::build(records);
    lines.push(String::new());
    lines.push(format!(
        "Lottery: {}, {}",
        plural(pool.entries().len(), "post", "posts"),
        plural(pool.total() as usize, "ticket", "tickets")
    ));

    lines
}

pub fn print_records_output(records: &RecordSequence, config: &SiteConfig) {
    for line in format_records_output(records, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Summary of a site build.
pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];

    for (i, (collection, title, count)) in summary.galleries.iter().enumerate() {
        lines.push(format!(
            "{} → gallery/{}.html ({})",
            entity_header(i + 1, title, None),
            collection,
            plural(*count, "post", "posts")
        ));
    }

    if !summary.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, (id, title)) in summary.posts.iter().enumerate() {
            lines.push(format!(
                "{} → post/{}.html",
                entity_header(i + 1, &post_label(title, id), None),
                id
            ));
        }
    }

    if !summary.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for reason in &summary.skipped {
            lines.push(format!("{}{}", indent(1), reason));
        }
    }

    lines.push(String::new());
    if let Some(id) = &summary.random {
        lines.push(format!("Random pick: {}", id));
    }
    lines.push(format!(
        "Generated {}, {}",
        plural(summary.galleries.len(), "gallery", "galleries"),
        plural(summary.posts.len(), "post", "posts")
    ));

    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}
