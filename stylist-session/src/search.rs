//! Search-by-id over the loaded catalog

use std::collections::VecDeque;

use serde::Serialize;
use shared::models::{Catalog, Selection, same_id};

const HISTORY_LEN: usize = 3;

/// Three-way lookup result (plus the no-op for blank queries)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Blank query; nothing happened
    Ignored,
    AlreadySelected,
    Found { selection: Selection },
    NotFound,
}

/// Classify `query` against the catalog and the current selection.
///
/// Never mutates anything; applying a `Found` result is the caller's job.
pub fn search_color(catalog: &Catalog, current: &Selection, query: &str) -> SearchOutcome {
    let needle = query.trim();
    if needle.is_empty() {
        return SearchOutcome::Ignored;
    }

    if !current.color_id.is_empty() && same_id(&current.color_id, needle) {
        return SearchOutcome::AlreadySelected;
    }

    match catalog.locate_color(needle) {
        None => SearchOutcome::NotFound,
        Some((family, color)) => {
            let hit = Selection::new(family.family_id.clone(), color.color_id.clone());
            if hit.matches(current) {
                SearchOutcome::AlreadySelected
            } else {
                SearchOutcome::Found { selection: hit }
            }
        }
    }
}

/// Most recent successful queries, newest first, no duplicates
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    recent: VecDeque<String>,
}

impl SearchHistory {
    pub fn record(&mut self, query: &str) {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return;
        }
        self.recent.retain(|existing| *existing != q);
        self.recent.push_front(q);
        self.recent.truncate(HISTORY_LEN);
    }

    pub fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }
}
