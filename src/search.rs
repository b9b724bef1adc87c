use std::sync::LazyLock;

use regex::Regex;

use crate::domain::models::{Episode, Show};

// Compiled once; stripping runs per list element on every filter pass.
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Summaries arrive from the catalog as HTML fragments. They are treated as
/// plain text everywhere: tags are dropped and whitespace collapsed, for both
/// matching and rendering.
pub fn strip_markup(text: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub trait Searchable {
    /// True when any searchable text field contains `term`. The term must
    /// already be lowercased; `filter` takes care of that.
    fn matches(&self, term: &str) -> bool;
}

impl Searchable for Show {
    fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self
                .genres
                .iter()
                .any(|genre| genre.to_lowercase().contains(term))
            || self
                .summary
                .as_deref()
                .map_or(false, |s| strip_markup(s).to_lowercase().contains(term))
    }
}

impl Searchable for Episode {
    fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self
                .summary
                .as_deref()
                .map_or(false, |s| strip_markup(s).to_lowercase().contains(term))
    }
}

/// Case-insensitive substring filter. An empty or whitespace-only term matches
/// everything. Input order is preserved and the input is never mutated.
pub fn filter<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&term)).collect()
}
