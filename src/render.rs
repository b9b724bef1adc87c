use std::fmt::Write;

use crate::domain::models::{Episode, Show};
use crate::search;

pub const NO_SHOWS: &str = "No shows available.";
pub const NO_MATCH: &str = "Oops, no match found.";

pub fn episode_code(season: u32, number: u32) -> String {
    format!("S{:02}E{:02}", season, number)
}

pub fn status_line(shown: usize, total: usize, noun: &str) -> String {
    format!("Showing {shown} / {total} {noun}")
}

pub fn episode_card(episode: &Episode) -> String {
    let image = episode
        .image
        .as_ref()
        .and_then(|img| img.medium.as_deref())
        .unwrap_or("(no image)");
    let summary = episode
        .summary
        .as_deref()
        .map(search::strip_markup)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "No summary available.".to_string());
    let link = episode.url.as_deref().unwrap_or("(no link)");

    format!(
        "{} — {}\n  image: {}\n  {}\n  {}\n",
        episode.name,
        episode_code(episode.season, episode.number),
        image,
        summary,
        link
    )
}

/// The card list for the current show: status line, then one card per visible
/// episode, or the no-match placeholder when the filter left nothing.
pub fn episode_page(visible: &[&Episode], total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(visible.len(), total, "episodes"));
    let _ = writeln!(out);

    if visible.is_empty() {
        let _ = writeln!(out, "{NO_MATCH}");
        return out;
    }

    for episode in visible {
        let _ = writeln!(out, "{}", episode_card(episode));
    }
    out
}

pub fn show_list(visible: &[&Show], total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(visible.len(), total, "shows"));
    let _ = writeln!(out);

    if visible.is_empty() {
        let _ = writeln!(out, "{NO_MATCH}");
        return out;
    }

    for show in visible {
        if show.genres.is_empty() {
            let _ = writeln!(out, "  {:>6}  {}", show.id, show.name);
        } else {
            let _ = writeln!(
                out,
                "  {:>6}  {} [{}]",
                show.id,
                show.name,
                show.genres.join(", ")
            );
        }
    }
    out
}

/// The selector view: always the full episode list of the current show, in
/// API order, regardless of the active search term.
pub fn episode_options(episodes: &[Episode]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "     all: every episode");
    for episode in episodes {
        let _ = writeln!(
            out,
            "  {:>6}: {} - {}",
            episode.id,
            episode_code(episode.season, episode.number),
            episode.name
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EpisodeImage;

    fn episode(id: u64, season: u32, number: u32, name: &str) -> Episode {
        Episode {
            id,
            season,
            number,
            name: name.to_string(),
            summary: None,
            image: None,
            url: None,
        }
    }

    #[test]
    fn test_episode_code_is_zero_padded() {
        assert_eq!(episode_code(1, 1), "S01E01");
        assert_eq!(episode_code(2, 15), "S02E15");
        assert_eq!(episode_code(10, 100), "S10E100");
    }

    #[test]
    fn test_card_title_and_fallbacks() {
        let card = episode_card(&episode(1, 1, 1, "Pilot"));
        assert!(card.starts_with("Pilot — S01E01\n"));
        assert!(card.contains("(no image)"));
        assert!(card.contains("No summary available."));
        assert!(card.contains("(no link)"));
    }

    #[test]
    fn test_card_uses_image_link_and_stripped_summary() {
        let mut ep = episode(1, 1, 1, "Pilot");
        ep.summary = Some("<p>A mysterious <b>dome</b></p>".to_string());
        ep.image = Some(EpisodeImage {
            medium: Some("http://img.example/1.jpg".to_string()),
        });
        ep.url = Some("http://tvmaze.example/episodes/1".to_string());

        let card = episode_card(&ep);
        assert!(card.contains("image: http://img.example/1.jpg"));
        assert!(card.contains("A mysterious dome"));
        assert!(!card.contains("<p>"));
        assert!(card.contains("http://tvmaze.example/episodes/1"));
    }

    #[test]
    fn test_status_line_for_narrowed_page() {
        // Two episodes fetched, one matching "pilot".
        let episodes = vec![episode(1, 1, 1, "Pilot"), episode(2, 1, 2, "Money")];
        let visible = crate::search::filter(&episodes, "pilot");
        let page = episode_page(&visible, episodes.len());

        assert!(page.starts_with("Showing 1 / 2 episodes\n"));
        assert!(page.contains("Pilot — S01E01"));
        assert!(!page.contains("Money"));
    }

    #[test]
    fn test_empty_page_shows_no_match_placeholder() {
        let page = episode_page(&[], 2);
        assert!(page.starts_with("Showing 0 / 2 episodes\n"));
        assert!(page.contains(NO_MATCH));
    }

    #[test]
    fn test_episode_options_list_full_set_in_order() {
        let episodes = vec![episode(7, 1, 1, "Pilot"), episode(8, 1, 2, "Money")];
        let options = episode_options(&episodes);
        let lines: Vec<&str> = options.lines().collect();

        assert_eq!(lines[0], "     all: every episode");
        assert!(lines[1].contains("7: S01E01 - Pilot"));
        assert!(lines[2].contains("8: S01E02 - Money"));
    }
}
