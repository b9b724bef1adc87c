use clap::Parser;

#[derive(Parser)]
#[command(name = "show-browser")]
#[command(about = "Browse TV shows and episodes from the TVMaze catalog")]
pub struct Cli {
    /// Show to open on startup, by id or name
    #[arg(long)]
    pub show: Option<String>,

    /// Catalog API base URL (overrides config file and environment)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Coalescing interval for rapid search updates, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}
