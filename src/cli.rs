// Command-line surface.
// Positional command keywords with a subject and optional page, plus global flags.

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gh-activity")]
#[command(about = "Fetch GitHub activity, profiles, stars, pull requests, issues and commits")]
#[command(version, disable_help_subcommand = true)]
pub struct Cli {
    /// Clear the console
    #[arg(short = 'c', long, global = true)]
    pub clear: bool,

    /// Print debug info
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// A username with an optional result page.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UserArgs {
    /// GitHub username
    pub username: String,

    /// Result page, starting at 1
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

/// An `owner/repo` with an optional result page.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RepoArgs {
    /// Repository as owner/repo
    pub repo: String,

    /// Result page, starting at 1
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Recent activity of a user
    Event(UserArgs),

    /// Repositories starred by a user
    #[command(name = "checkStarred")]
    CheckStarred(UserArgs),

    /// Profile details of a user
    Profile {
        /// GitHub username
        username: String,
    },

    /// Pull requests a user opened in the last 30 days
    Pulls(UserArgs),

    /// Open issues of a repository
    Issues(RepoArgs),

    /// Recent commits of a repository
    Commits(RepoArgs),

    /// Public repositories of a user
    Repos(UserArgs),

    /// Current API rate limit status
    #[command(name = "checklimit")]
    CheckLimit,

    /// Delete the local response cache
    #[command(name = "endSession")]
    EndSession,

    /// Show help information
    Help,
}

impl Command {
    /// Keyword used on the command line and as the cache key prefix.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Event(_) => "event",
            Command::CheckStarred(_) => "checkStarred",
            Command::Profile { .. } => "profile",
            Command::Pulls(_) => "pulls",
            Command::Issues(_) => "issues",
            Command::Commits(_) => "commits",
            Command::Repos(_) => "repos",
            Command::CheckLimit => "checklimit",
            Command::EndSession => "endSession",
            Command::Help => "help",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_default_page() {
        let cli = Cli::try_parse_from(["gh-activity", "event", "octocat"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Event(UserArgs {
                username: "octocat".to_string(),
                page: 1
            }))
        );
    }

    #[test]
    fn test_parse_camel_case_keywords() {
        let cli = Cli::try_parse_from(["gh-activity", "checkStarred", "octocat", "3"]).unwrap();
        assert_eq!(cli.command.as_ref().map(Command::keyword), Some("checkStarred"));

        let cli = Cli::try_parse_from(["gh-activity", "endSession"]).unwrap();
        assert_eq!(cli.command, Some(Command::EndSession));

        let cli = Cli::try_parse_from(["gh-activity", "checklimit"]).unwrap();
        assert_eq!(cli.command, Some(Command::CheckLimit));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["gh-activity", "-c", "-d", "profile", "octocat"]).unwrap();
        assert!(cli.clear);
        assert!(cli.debug);

        let cli = Cli::try_parse_from(["gh-activity", "issues", "o/r", "--debug"]).unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn test_missing_subject_is_usage_error() {
        assert!(Cli::try_parse_from(["gh-activity", "event"]).is_err());
        assert!(Cli::try_parse_from(["gh-activity", "issues"]).is_err());
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(Cli::try_parse_from(["gh-activity", "repos", "octocat", "0"]).is_err());
    }

    #[test]
    fn test_help_keyword() {
        let cli = Cli::try_parse_from(["gh-activity", "help"]).unwrap();
        assert_eq!(cli.command, Some(Command::Help));
    }
}
