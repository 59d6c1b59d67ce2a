use std::path::PathBuf;

use clap::Parser;

/// Stream a hotel-room scrape from the backend and export the result as CSV.
#[derive(Parser, Debug)]
#[command(name = "scrape-client", version, about, long_about = None)]
pub struct Args {
    /// Website URL to analyze; prompted for when omitted
    pub url: Option<String>,

    /// Base URL of the scraping backend
    #[arg(long)]
    pub server: Option<String>,

    /// Directory the exported CSV is saved to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write the raw content, analysis and results regions to an HTML file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not export the structured data once it arrives
    #[arg(long)]
    pub no_export: bool,

    /// Configuration file (RON format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
