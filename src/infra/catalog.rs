use anyhow::{bail, Result};

use crate::domain::models::{Episode, Show};

pub const DEFAULT_API_BASE: &str = "https://api.tvmaze.com";

/// Seam between the session cache and the network, so the cache and the
/// application loop can be exercised against a fake catalog.
pub trait CatalogSource {
    fn fetch_shows(&self) -> Result<Vec<Show>>;
    fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>>;
}

#[derive(Debug, Clone)]
pub struct TvMazeClient {
    api_base: String,
}

impl TvMazeClient {
    pub fn new(api_base: String) -> Self {
        Self { api_base }
    }
}

impl CatalogSource for TvMazeClient {
    fn fetch_shows(&self) -> Result<Vec<Show>> {
        let client = reqwest::blocking::Client::new();
        let response = client.get(format!("{}/shows", self.api_base)).send()?;

        if !response.status().is_success() {
            bail!("Show list fetch failed: HTTP {}", response.status());
        }

        let shows: Vec<Show> = serde_json::from_str(&response.text()?)?;
        Ok(shows)
    }

    fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>> {
        let client = reqwest::blocking::Client::new();
        let response = client
            .get(format!("{}/shows/{}/episodes", self.api_base, show_id))
            .send()?;

        if !response.status().is_success() {
            bail!(
                "Episode list fetch failed for show {}: HTTP {}",
                show_id,
                response.status()
            );
        }

        let episodes: Vec<Episode> = serde_json::from_str(&response.text()?)?;
        Ok(episodes)
    }
}
