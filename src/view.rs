use std::time::{Duration, Instant};

use crate::domain::models::Episode;
use crate::search;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeSelection {
    All,
    One(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ShowingList,
    ShowingSingle,
}

/// Search term and episode selection for the current show. Mutated only by the
/// input handlers below; everything visible is derived via `visible_episodes`.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    search_term: String,
    selection: EpisodeSelection,
}

impl Default for EpisodeSelection {
    fn default() -> Self {
        EpisodeSelection::All
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn mode(&self) -> Mode {
        match self.selection {
            EpisodeSelection::All => Mode::ShowingList,
            EpisodeSelection::One(_) => Mode::ShowingSingle,
        }
    }

    /// A new term always drops the selection back to the full filtered list.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_lowercase();
        self.selection = EpisodeSelection::All;
    }

    /// Show switch: both controls return to their defaults.
    pub fn reset(&mut self) {
        self.search_term.clear();
        self.selection = EpisodeSelection::All;
    }

    /// Selecting a single episode clears the visible term; the show's full
    /// episode list stays cached and is restored by `select_all`.
    pub fn select_episode(&mut self, id: u64) {
        self.search_term.clear();
        self.selection = EpisodeSelection::One(id);
    }

    pub fn select_all(&mut self) {
        self.selection = EpisodeSelection::All;
    }

    /// Filter by the current term, then narrow to the single selection if one
    /// is active. A stale selection (id absent from the available set, e.g.
    /// right after a show switch) yields an empty list rather than an error.
    pub fn visible_episodes<'a>(&self, episodes: &'a [Episode]) -> Vec<&'a Episode> {
        let filtered = search::filter(episodes, &self.search_term);
        match self.selection {
            EpisodeSelection::All => filtered,
            EpisodeSelection::One(id) => {
                filtered.into_iter().filter(|ep| ep.id == id).collect()
            }
        }
    }
}

/// Coalesces rapid search updates: an update inside the interval since the
/// last accepted one is absorbed, so a fast typist does not trigger a full
/// filter-and-render pass per edit.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn should_fire(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(prev) if now.duration_since(prev) < self.interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}
