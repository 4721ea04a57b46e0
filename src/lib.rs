//! # Sheetfolio
//!
//! A static site generator for portfolios kept in a spreadsheet.
//! One published CSV is the data source: rows become posts, the `collection`
//! column groups them into galleries, and `show` decides what is public.
//!
//! # Architecture
//!
//! ```text
//! 1. Load      CSV URL or file  →  RecordSequence   (fetched once per run)
//! 2. Select    records          →  views            (visibility, lookup, neighbours, lottery)
//! 3. Render    views            →  dist/            (final HTML site)
//! ```
//!
//! Every page in a run reads the same memoized [`loader::Loader`], so a build
//! fetches the sheet exactly once no matter how many pages it writes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`loader`] | Fetch-once, single-flight record loading over a pluggable [`loader::Transport`] |
//! | [`parse`] | Forgiving CSV parser for spreadsheet exports |
//! | [`types`] | `Record` and `RecordSequence` |
//! | [`select`] | Visibility filter, id lookup, prev/next neighbours, weighted random pick |
//! | [`embed`] | Sorts the `embed` cell into an [`embed::EmbedDirective`] |
//! | [`content`] | Turns a record into the post and card views a page shows |
//! | [`page`] | Page requests and their resolution, including error kinds |
//! | [`generate`] | Renders pages with Maud and writes the static site |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Interpolation is
//! auto-escaped, so a stray `<` in a sheet cell cannot break a page. The two
//! places that do emit raw markup, the Markdown `content` cell and raw-HTML
//! embeds, are marked with `PreEscaped` in [`generate`].
//!
//! ## The Sheet Is the Source of Truth
//!
//! Nothing is cached between runs. Editing a row and rebuilding is the whole
//! publishing workflow.

pub mod config;
pub mod content;
pub mod embed;
pub mod generate;
pub mod loader;
pub mod output;
pub mod page;
pub mod parse;
pub mod select;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
