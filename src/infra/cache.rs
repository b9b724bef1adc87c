use std::collections::HashMap;

use anyhow::Result;

use crate::domain::models::{Episode, Show};
use crate::infra::catalog::CatalogSource;

/// Session-scoped, in-memory catalog cache. Each key is fetched at most once;
/// a failed fetch leaves its slot empty so a later call can retry. Everything
/// runs on the single UI thread and a cold-cache fetch completes before the
/// caller resumes, so no two fetches for the same key can overlap.
pub struct Library {
    source: Box<dyn CatalogSource>,
    shows: Option<Vec<Show>>,
    episodes: HashMap<u64, Vec<Episode>>,
}

impl Library {
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self {
            source,
            shows: None,
            episodes: HashMap::new(),
        }
    }

    pub fn shows(&mut self) -> Result<&[Show]> {
        if self.shows.is_none() {
            self.shows = Some(self.source.fetch_shows()?);
        }
        Ok(self.shows.as_deref().unwrap_or(&[]))
    }

    pub fn episodes(&mut self, show_id: u64) -> Result<&[Episode]> {
        if !self.episodes.contains_key(&show_id) {
            let episodes = self.source.fetch_episodes(show_id)?;
            self.episodes.insert(show_id, episodes);
        }
        Ok(self
            .episodes
            .get(&show_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    pub fn has_episodes(&self, show_id: u64) -> bool {
        self.episodes.contains_key(&show_id)
    }

    pub fn show_name(&self, show_id: u64) -> Option<&str> {
        self.shows
            .as_ref()?
            .iter()
            .find(|show| show.id == show_id)
            .map(|show| show.name.as_str())
    }
}
