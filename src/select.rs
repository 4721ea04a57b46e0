//! Record selection: visibility, lookup, neighbours, and the weighted lottery.
//!
//! All functions are pure over a slice of records and preserve sheet order.
//! The `show` and `prob` columns stay strings in [`Record`]; they are
//! interpreted here and nowhere else.

use crate::types::Record;
use rand::Rng;

/// Weight used when `prob` is absent, empty, or not a number.
pub const DEFAULT_WEIGHT: i64 = 2;

/// A record is visible when its `show` cell, lower-cased, is exactly `y`.
pub fn is_visible(record: &Record) -> bool {
    record.get("show").to_lowercase() == "y"
}

/// Visible records, optionally restricted to one collection (exact match).
pub fn filter_visible<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    collection: Option<&str>,
) -> Vec<&'a Record> {
    records
        .into_iter()
        .filter(|r| is_visible(r))
        .filter(|r| collection.is_none_or(|c| r.collection() == c))
        .collect()
}

/// First record whose `id` equals `id` exactly.
pub fn resolve<'a>(records: impl IntoIterator<Item = &'a Record>, id: &str) -> Option<&'a Record> {
    records.into_iter().find(|r| r.id() == id)
}

/// Like [`resolve`], but hidden rows never match.
pub fn resolve_visible<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    id: &str,
) -> Option<&'a Record> {
    records.into_iter().find(|r| is_visible(r) && r.id() == id)
}

/// Previous and next records around a position in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a Record>,
    pub next: Option<&'a Record>,
}

/// Row-order neighbours of `current_id` within `visible`.
///
/// Both sides are `None` when `current_id` is not in the list.
pub fn neighbors<'a>(visible: &[&'a Record], current_id: &str) -> Neighbors<'a> {
    let Some(idx) = visible.iter().position(|r| r.id() == current_id) else {
        return Neighbors::default();
    };
    Neighbors {
        prev: idx.checked_sub(1).map(|i| visible[i]),
        next: visible.get(idx + 1).copied(),
    }
}

/// Lottery weight of a record.
///
/// Reads the leading integer of the trimmed `prob` cell (`"3"` and `"3 pts"`
/// are both 3, `"-1"` is -1). Anything without leading digits falls back to
/// [`DEFAULT_WEIGHT`].
pub fn weight(record: &Record) -> i64 {
    leading_int(record.get("prob").trim()).unwrap_or(DEFAULT_WEIGHT)
}

fn leading_int(s: &str) -> Option<i64> {
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurd weights rather than reject them.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * magnitude)
}

/// The weighted multiset of ids used for random picks.
///
/// Each eligible record is one entry carrying its weight, which is
/// equivalent to repeating its id `weight` times without materializing the
/// repeats. Eligible means visible, non-empty id, and weight above zero; a
/// weight of zero or less takes a record out of the draw.
#[derive(Debug, Clone, Default)]
pub struct LotteryPool<'a> {
    entries: Vec<(&'a str, u64)>,
    total: u64,
}

impl<'a> LotteryPool<'a> {
    pub fn build(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut pool = Self::default();
        for record in records.into_iter().filter(|r| is_visible(r)) {
            let id = record.id();
            let w = weight(record);
            if id.is_empty() || w <= 0 {
                continue;
            }
            let w = w as u64;
            pool.entries.push((id, w));
            pool.total = pool.total.saturating_add(w);
        }
        pool
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Total number of tickets in the pool.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(id, tickets)` pairs in sheet order.
    pub fn entries(&self) -> &[(&'a str, u64)] {
        &self.entries
    }

    /// Draw one ticket uniformly; `None` when the pool is empty.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a str> {
        if self.is_empty() {
            return None;
        }
        let mut ticket = rng.random_range(0..self.total);
        for &(id, w) in &self.entries {
            if ticket < w {
                return Some(id);
            }
            ticket -= w;
        }
        None
    }
}

/// Pick one visible id at random, weighted by `prob`.
pub fn pick_weighted<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<String> {
    LotteryPool::build(records)
        .draw(&mut rand::rng())
        .map(str::to_string)
}

/// Distinct collections of visible records, in first-appearance order.
pub fn collections<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in records.into_iter().filter(|r| is_visible(r)) {
        let c = record.collection();
        if !c.is_empty() && !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}
