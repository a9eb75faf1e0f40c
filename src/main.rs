use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use wastearr::cli::{commands, Cli};
use wastearr::config::{Config, Paths};
use wastearr::error::WastearrError;
use wastearr::output::terminal_width;

fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), WastearrError> {
    let cli = Cli::parse();

    // Completions need no config or logging
    if let Some(shell) = cli.completions {
        Cli::print_completions(shell);
        return Ok(());
    }

    init_logging(cli.verbose);

    let paths = Paths::new()?;
    let config = Config::load_from(&paths);

    let output = commands::analyze(&cli, &config, &paths, terminal_width())?;

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err())
        .compact()
        .init();
}
