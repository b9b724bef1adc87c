mod cli;
mod config;
mod domain;
mod infra;
mod render;
mod search;
mod view;

use anyhow::{bail, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use cli::Cli;
use domain::models::Show;
use infra::cache::Library;
use infra::catalog::TvMazeClient;
use view::{Debouncer, Mode, ViewState};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = config::load()?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base.trim_end_matches('/').to_string();
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }

    let client = TvMazeClient::new(config.api_base.clone());
    let mut library = Library::new(Box::new(client));

    println!("Loading shows...");
    let shows = match startup_shows(&mut library) {
        Ok(Some(shows)) => shows,
        Ok(None) => {
            println!("{}", render::NO_SHOWS);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            bail!("Failed to load shows. Please try again later.");
        }
    };

    let mut session = Session {
        library,
        shows,
        selected_show: None,
        view: ViewState::new(),
        debouncer: Debouncer::new(config.debounce),
        pending_render: false,
    };

    if let Some(query) = cli.show {
        match choose_show(&session.shows, &query) {
            Ok(Some(id)) => session.open_show(id),
            Ok(None) => eprintln!("No show matching '{query}'"),
            Err(e) => eprintln!("{e}"),
        }
    }
    if session.selected_show.is_none() {
        session.list_shows("");
    }

    repl(&mut session)
}

/// Initial show list, sorted alphabetically for listings (the cache keeps API
/// order); `None` when the catalog is empty, in which case no episode fetch
/// must follow.
fn startup_shows(library: &mut Library) -> Result<Option<Vec<Show>>> {
    let mut shows = library.shows()?.to_vec();
    if shows.is_empty() {
        return Ok(None);
    }
    shows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Some(shows))
}

struct Session {
    library: Library,
    shows: Vec<Show>,
    selected_show: Option<u64>,
    view: ViewState,
    debouncer: Debouncer,
    pending_render: bool,
}

impl Session {
    fn list_shows(&self, term: &str) {
        let visible = search::filter(&self.shows, term);
        print!("{}", render::show_list(&visible, self.shows.len()));
    }

    /// Loads (or re-uses) the show's episode list, then resets both the search
    /// term and the episode selection to their defaults.
    fn open_show(&mut self, show_id: u64) {
        if !self.library.has_episodes(show_id) {
            println!("Loading episodes...");
        }
        if let Err(e) = self.library.episodes(show_id) {
            eprintln!("{e}");
            eprintln!("Failed to load episodes. Please try again later.");
            return;
        }
        self.selected_show = Some(show_id);
        self.view.reset();
        self.print_episode_options();
        self.render_episodes();
    }

    fn render_episodes(&mut self) {
        let Some(show_id) = self.selected_show else {
            return;
        };
        let episodes = match self.library.episodes(show_id) {
            Ok(episodes) => episodes,
            Err(e) => {
                eprintln!("{e}");
                eprintln!("Failed to load episodes. Please try again later.");
                return;
            }
        };
        let visible = self.view.visible_episodes(episodes);
        print!("{}", render::episode_page(&visible, episodes.len()));
    }

    /// The selector invariant: always the full episode list of the current
    /// show, whatever the search term says.
    fn print_episode_options(&mut self) {
        let Some(show_id) = self.selected_show else {
            return;
        };
        if let Ok(episodes) = self.library.episodes(show_id) {
            print!("{}", render::episode_options(episodes));
        }
    }

    fn do_search(&mut self, term: &str) {
        if self.selected_show.is_none() {
            self.list_shows(term);
            return;
        }
        self.view.set_search_term(term);
        if self.debouncer.should_fire(Instant::now()) {
            self.render_episodes();
            self.pending_render = false;
        } else {
            // Coalesced: the render is owed and flushed before the next prompt,
            // so the newest term always reaches the card list.
            self.pending_render = true;
        }
    }

    fn flush_pending_render(&mut self) {
        if self.pending_render {
            self.pending_render = false;
            self.render_episodes();
        }
    }

    fn current_show_name(&self) -> Option<&str> {
        self.library.show_name(self.selected_show?)
    }
}

fn repl(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Type 'help' for commands.");

    loop {
        let prompt = match session.current_show_name() {
            Some(name) => match session.view.mode() {
                Mode::ShowingSingle => format!("{name} (episode)> "),
                Mode::ShowingList if !session.view.search_term().is_empty() => {
                    format!("{name} /{}> ", session.view.search_term())
                }
                Mode::ShowingList => format!("{name}> "),
            },
            None => "shows> ".to_string(),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if !dispatch(session, line) {
                    break;
                }
                session.flush_pending_render();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Returns false when the session should end.
fn dispatch(session: &mut Session, line: &str) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "quit" | "exit" => return false,
        "help" => print_help(),
        "shows" => session.list_shows(rest),
        "show" => {
            if rest.is_empty() {
                eprintln!("Usage: show <id|name>");
            } else {
                match choose_show(&session.shows, rest) {
                    Ok(Some(id)) => session.open_show(id),
                    Ok(None) => eprintln!("No show matching '{rest}'"),
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
        "search" => session.do_search(rest),
        "episodes" => {
            if session.selected_show.is_none() {
                eprintln!("Select a show first (try 'shows' then 'show <id|name>').");
            } else {
                session.print_episode_options();
            }
        }
        "pick" => match rest.parse::<u64>() {
            Ok(id) if session.selected_show.is_some() => {
                session.view.select_episode(id);
                session.render_episodes();
            }
            Ok(_) => eprintln!("Select a show first."),
            Err(_) => eprintln!("Usage: pick <episode id>"),
        },
        "all" => {
            if session.selected_show.is_none() {
                eprintln!("Select a show first.");
            } else {
                session.view.select_all();
                session.render_episodes();
            }
        }
        "back" => {
            session.selected_show = None;
            session.view.reset();
            session.list_shows("");
        }
        _ => eprintln!("Unknown command '{command}'. Type 'help' for commands."),
    }
    true
}

/// Exact id wins, then exact name, then name substring (all case-insensitive).
fn match_shows<'a>(shows: &'a [Show], query: &str) -> Vec<&'a Show> {
    if let Ok(id) = query.parse::<u64>() {
        if let Some(show) = shows.iter().find(|show| show.id == id) {
            return vec![show];
        }
    }

    let needle = query.to_lowercase();
    let exact: Vec<&Show> = shows
        .iter()
        .filter(|show| show.name.to_lowercase() == needle)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    shows
        .iter()
        .filter(|show| show.name.to_lowercase().contains(&needle))
        .collect()
}

fn choose_show(shows: &[Show], query: &str) -> Result<Option<u64>> {
    let matches = match_shows(shows, query);

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].id)),
        _ => {
            println!("Multiple shows found. Please select one:");
            for (i, show) in matches.iter().enumerate() {
                println!("  {}: {} (ID: {})", i + 1, show.name, show.id);
            }

            print!("Enter number (1-{}): ", matches.len());
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let choice: usize = input
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid selection"))?;

            if choice < 1 || choice > matches.len() {
                bail!("Invalid selection");
            }

            Ok(Some(matches[choice - 1].id))
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  shows [term]      list shows, optionally filtered");
    println!("  show <id|name>    open a show and load its episodes");
    println!("  search [term]     filter the current episode list (empty term clears)");
    println!("  episodes          list every episode of the current show");
    println!("  pick <id>         view a single episode");
    println!("  all               back to the full episode list");
    println!("  back              return to the show list");
    println!("  help              this message");
    println!("  quit              exit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Episode;
    use infra::catalog::CatalogSource;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeCatalog {
        shows: Vec<Show>,
        episodes: Vec<Episode>,
        episode_fetches: Rc<Cell<usize>>,
    }

    impl CatalogSource for FakeCatalog {
        fn fetch_shows(&self) -> Result<Vec<Show>> {
            Ok(self.shows.clone())
        }

        fn fetch_episodes(&self, _show_id: u64) -> Result<Vec<Episode>> {
            self.episode_fetches.set(self.episode_fetches.get() + 1);
            Ok(self.episodes.clone())
        }
    }

    fn show(id: u64, name: &str) -> Show {
        Show {
            id,
            name: name.to_string(),
            genres: vec![],
            summary: None,
        }
    }

    fn episode(id: u64, name: &str) -> Episode {
        Episode {
            id,
            season: 1,
            number: id as u32,
            name: name.to_string(),
            summary: None,
            image: None,
            url: None,
        }
    }

    fn test_session(episodes: Vec<Episode>) -> Session {
        let catalog = FakeCatalog {
            shows: vec![show(1, "Under the Dome")],
            episodes,
            episode_fetches: Rc::new(Cell::new(0)),
        };
        let mut library = Library::new(Box::new(catalog));
        library.shows().unwrap();
        Session {
            library,
            shows: vec![show(1, "Under the Dome")],
            selected_show: Some(1),
            view: ViewState::new(),
            // Large interval so the second update always lands in the window.
            debouncer: Debouncer::new(Duration::from_secs(3600)),
            pending_render: false,
        }
    }

    #[test]
    fn test_match_shows_by_id() {
        let shows = vec![show(82, "Under the Dome"), show(83, "Girls")];
        let matches = match_shows(&shows, "83");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Girls");
    }

    #[test]
    fn test_match_shows_exact_name_beats_substring() {
        let shows = vec![show(1, "Girls"), show(2, "Gossip Girls")];
        let matches = match_shows(&shows, "girls");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);
    }

    #[test]
    fn test_match_shows_substring_case_insensitive() {
        let shows = vec![show(1, "Under the Dome"), show(2, "Homecoming")];
        let matches = match_shows(&shows, "DOME");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);
    }

    #[test]
    fn test_match_shows_none() {
        let shows = vec![show(1, "Under the Dome")];
        assert!(match_shows(&shows, "archer").is_empty());
    }

    #[test]
    fn test_unknown_id_falls_back_to_name_match() {
        // "24" is a show name as well as a plausible id.
        let shows = vec![show(1, "24")];
        let matches = match_shows(&shows, "24");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);
    }

    #[test]
    fn test_empty_catalog_issues_no_episode_fetch() {
        let fetches = Rc::new(Cell::new(0));
        let catalog = FakeCatalog {
            shows: vec![],
            episodes: vec![],
            episode_fetches: Rc::clone(&fetches),
        };
        let mut library = Library::new(Box::new(catalog));

        assert!(startup_shows(&mut library).unwrap().is_none());
        assert_eq!(fetches.get(), 0);
    }

    #[test]
    fn test_startup_shows_sorted_case_insensitively() {
        let catalog = FakeCatalog {
            shows: vec![show(1, "girls"), show(2, "Archer"), show(3, "Bones")],
            episodes: vec![],
            episode_fetches: Rc::new(Cell::new(0)),
        };
        let mut library = Library::new(Box::new(catalog));

        let shows = startup_shows(&mut library).unwrap().unwrap();
        let names: Vec<&str> = shows.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Archer", "Bones", "girls"]);
    }

    #[test]
    fn test_absorbed_search_is_flushed_before_next_prompt() {
        let mut session = test_session(vec![episode(1, "Pilot"), episode(2, "Money")]);

        // First update renders right away.
        session.do_search("dome");
        assert!(!session.pending_render);

        // Second update inside the interval: term stored, render owed.
        session.do_search("pilot");
        assert!(session.pending_render);
        assert_eq!(session.view.search_term(), "pilot");

        // The loop flushes the owed render before reading the next command.
        session.flush_pending_render();
        assert!(!session.pending_render);
        assert_eq!(session.view.search_term(), "pilot");
    }

    #[test]
    fn test_flush_without_pending_render_is_a_no_op() {
        let mut session = test_session(vec![episode(1, "Pilot")]);
        session.flush_pending_render();
        assert!(!session.pending_render);
    }
}
