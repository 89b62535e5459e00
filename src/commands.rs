// Command handlers.
// Builds the request and cache key for each command, fetches once, and renders the result.

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::cache::{ApiRequest, CachedFetcher};
use crate::cli::{Command, RepoArgs, UserArgs};
use crate::display;
use crate::error::{ActivityError, Result};
use crate::github::{
    Commit, Endpoint, Event, Issue, RateLimitStatus, RemoteService, RepoName, Repository,
    SearchResults, User,
};

/// How far back `pulls` searches.
pub const PULLS_WINDOW_DAYS: u64 = 30;

/// Cache key for a command, subject and optional page.
pub fn cache_key(keyword: &str, subject: &str, page: Option<u32>) -> String {
    match page {
        Some(page) => format!("{}_{}_{}", keyword, subject, page),
        None => format!("{}_{}", keyword, subject),
    }
}

fn validate_username(username: &str) -> Result<&str> {
    let username = username.trim();
    if username.is_empty() || username.contains(char::is_whitespace) || username.contains('/') {
        return Err(ActivityError::Usage(format!(
            "'{}' is not a valid GitHub username",
            username
        )));
    }
    Ok(username)
}

/// Build the request a command issues. `today` anchors the pull request window.
pub fn build_request(command: &Command, today: NaiveDate) -> Result<Option<ApiRequest>> {
    let keyword = command.keyword();

    let user_request = |args: &UserArgs, endpoint: fn(String) -> Endpoint| -> Result<ApiRequest> {
        let username = validate_username(&args.username)?;
        Ok(ApiRequest::cached(
            endpoint(username.to_string()),
            args.page,
            cache_key(keyword, username, Some(args.page)),
        ))
    };

    let repo_request = |args: &RepoArgs, endpoint: fn(RepoName) -> Endpoint| -> Result<ApiRequest> {
        let repo: RepoName = args.repo.parse()?;
        let key = cache_key(keyword, &repo.to_string(), Some(args.page));
        Ok(ApiRequest::cached(endpoint(repo), args.page, key))
    };

    let request = match command {
        Command::Event(args) => user_request(args, |username| Endpoint::UserEvents { username })?,
        Command::CheckStarred(args) => {
            user_request(args, |username| Endpoint::UserStarred { username })?
        }
        Command::Repos(args) => user_request(args, |username| Endpoint::UserRepos { username })?,
        Command::Pulls(args) => {
            let username = validate_username(&args.username)?;
            let since = today
                .checked_sub_days(Days::new(PULLS_WINDOW_DAYS))
                .unwrap_or(today);
            ApiRequest::cached(
                Endpoint::SearchPullRequests {
                    username: username.to_string(),
                    since,
                },
                args.page,
                cache_key(keyword, username, Some(args.page)),
            )
        }
        Command::Profile { username } => {
            let username = validate_username(username)?;
            ApiRequest::cached(
                Endpoint::UserProfile {
                    username: username.to_string(),
                },
                1,
                cache_key(keyword, username, None),
            )
        }
        Command::Issues(args) => repo_request(args, |repo| Endpoint::RepoIssues { repo })?,
        Command::Commits(args) => repo_request(args, |repo| Endpoint::RepoCommits { repo })?,
        Command::CheckLimit => ApiRequest::uncached(Endpoint::RateLimit),
        Command::EndSession | Command::Help => return Ok(None),
    };

    Ok(Some(request))
}

fn no_data(subject: &str) -> String {
    format!("❌ No data returned for {}.\n", subject)
}

/// Run `command` and return the text to print.
pub async fn run<R: RemoteService>(
    command: &Command,
    fetcher: &mut CachedFetcher<R>,
    today: NaiveDate,
) -> Result<String> {
    if *command == Command::EndSession {
        fetcher.clear()?;
        info!("session ended, cache removed");
        return Ok("🧹 Session ended, cache cleared.\n".to_string());
    }

    let Some(request) = build_request(command, today)? else {
        return Ok(display::HELP.to_string());
    };

    let output = match command {
        Command::Event(args) => {
            let username = args.username.trim();
            let header = format!("\n🔍 Fetching GitHub activity for user: {}\n", username);
            match fetcher.fetch_as::<Vec<Event>>(&request).await? {
                Some(events) => header + &display::render_events(&events),
                None => header + &no_data(username),
            }
        }
        Command::CheckStarred(args) => {
            let username = args.username.trim();
            let header = format!("\n⭐ Starred repositories of {}\n\n", username);
            match fetcher.fetch_as::<Vec<Repository>>(&request).await? {
                Some(repos) => header + &display::render_starred(&repos),
                None => header + &no_data(username),
            }
        }
        Command::Profile { username } => {
            let username = username.trim();
            let header = format!("\n📌 Fetching profile details for: {}\n\n", username);
            match fetcher.fetch_as::<User>(&request).await? {
                Some(user) => header + &display::render_profile(&user),
                None => header + &no_data(username),
            }
        }
        Command::Pulls(args) => {
            let username = args.username.trim();
            let header = format!(
                "\n📌 Pull requests created by {} in the last {} days\n",
                username, PULLS_WINDOW_DAYS
            );
            match fetcher.fetch_as::<SearchResults<Issue>>(&request).await? {
                Some(results) => {
                    header
                        + &display::render_issues(
                            "PR",
                            &results.items,
                            "No recent pull requests found.",
                        )
                }
                None => header + &no_data(username),
            }
        }
        Command::Issues(args) => {
            let repo = args.repo.trim();
            let header = format!("\n📌 Open issues for: {}\n", repo);
            match fetcher.fetch_as::<Vec<Issue>>(&request).await? {
                Some(issues) => {
                    header + &display::render_issues("Issue", &issues, "No open issues found.")
                }
                None => header + &no_data(repo),
            }
        }
        Command::Commits(args) => {
            let repo = args.repo.trim();
            let header = format!("\n📌 Recent commits for: {}\n", repo);
            match fetcher.fetch_as::<Vec<Commit>>(&request).await? {
                Some(commits) => header + &display::render_commits(&commits),
                None => header + &no_data(repo),
            }
        }
        Command::Repos(args) => {
            let username = args.username.trim();
            let header = format!("\n📦 Repositories of {}\n", username);
            match fetcher.fetch_as::<Vec<Repository>>(&request).await? {
                Some(repos) => header + &display::render_repos(&repos),
                None => header + &no_data(username),
            }
        }
        Command::CheckLimit => {
            let header = "\n⏱ GitHub API rate limit\n".to_string();
            match fetcher.fetch_as::<RateLimitStatus>(&request).await? {
                Some(status) => header + &display::render_rate_limit(&status),
                None => header + &no_data("rate limit"),
            }
        }
        Command::EndSession | Command::Help => display::HELP.to_string(),
    };

    Ok(output)
}
