// gh-activity entry point.
// Parses arguments, sets up logging, and runs a single command.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gh_activity::cache::CachedFetcher;
use gh_activity::cli::{Cli, Command};
use gh_activity::config::Config;
use gh_activity::github::GitHubClient;
use gh_activity::{Result, commands, display};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; RUST_LOG overrides the default level
    let default_filter = if cli.debug {
        "gh_activity=debug"
    } else {
        "gh_activity=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.clear {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    }
    debug!(clear = cli.clear, debug = cli.debug, command = ?cli.command, "parsed flags");

    let command = cli.command.unwrap_or(Command::Help);
    if command == Command::Help {
        print!("{}", display::HELP);
        return Ok(());
    }

    let config = Config::from_env();
    debug!(
        path = %config.cache.path.display(),
        capacity = config.cache.capacity,
        authenticated = config.token.is_some(),
        "configuration loaded"
    );

    let client = GitHubClient::new(config.token.as_deref())?;
    let mut fetcher = CachedFetcher::new(&config.cache, client);

    let output = commands::run(&command, &mut fetcher, Local::now().date_naive()).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
