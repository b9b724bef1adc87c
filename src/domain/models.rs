use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Show {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Episode {
    pub id: u64,
    pub season: u32,
    pub number: u32,
    pub name: String,
    pub summary: Option<String>,
    pub image: Option<EpisodeImage>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EpisodeImage {
    pub medium: Option<String>,
}
