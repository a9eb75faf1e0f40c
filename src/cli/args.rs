use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::pipeline::Filters;
use crate::size::parse_size;
use crate::sources::SourceKind;

/// Find media in your Sonarr/Radarr library that costs more disk than its rating deserves
#[derive(Parser, Debug)]
#[command(name = "wastearr")]
#[command(version)]
#[command(
    about = "Find media in your Sonarr/Radarr library that costs more disk than its rating deserves"
)]
pub struct Cli {
    /// Service to analyze: 'sonarr' for TV series, 'radarr' for movies (default: both)
    #[arg(value_enum)]
    pub source: Option<SourceKind>,

    /// Show only the N items with the highest waste scores
    #[arg(short = 't', long, value_name = "N")]
    pub top_waste: Option<usize>,

    /// Show only items with waste score >= SCORE
    #[arg(short = 's', long, value_name = "SCORE")]
    pub waste_score: Option<f64>,

    /// Show only items with size >= SIZE (e.g. 12M, 3GB, 500MB)
    #[arg(short = 'm', long, value_name = "SIZE", value_parser = parse_size_arg)]
    pub min_size: Option<u64>,

    /// Show only items rated <= RATING (e.g. 6.2); unrated items are kept
    #[arg(short = 'r', long, value_name = "RATING")]
    pub ratings: Option<f64>,

    /// Also list items with nothing downloaded
    #[arg(short = 'a', long)]
    pub include_missing: bool,

    /// Clear the cache before fetching
    #[arg(long)]
    pub clear_cache: bool,

    /// Bypass the cache entirely (never read, never written)
    #[arg(long)]
    pub no_cache: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable table
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

fn parse_size_arg(s: &str) -> std::result::Result<u64, String> {
    parse_size(s).map_err(|e| e.to_string())
}

impl Cli {
    /// Services selected for this run
    pub fn sources(&self) -> Vec<SourceKind> {
        match self.source {
            Some(kind) => vec![kind],
            None => SourceKind::ALL.to_vec(),
        }
    }

    /// Filters selected for this run
    pub fn filters(&self) -> Filters {
        Filters {
            downloaded_only: !self.include_missing,
            min_size: self.min_size,
            max_rating: self.ratings,
            min_waste_score: self.waste_score,
            top: self.top_waste,
        }
    }

    /// Write a completion script for `shell` to stdout
    pub fn print_completions(shell: Shell) {
        let mut command = Self::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    }
}
