// Report rendering.
// Turns typed API responses into the text each command prints.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::github::{Commit, Event, Issue, RateLimitStatus, RateLimitWindow, Repository, User};

/// Number of items shown for list commands.
pub const LIST_LIMIT: usize = 5;
/// Number of topics shown per starred repository.
pub const TOPIC_LIMIT: usize = 5;

/// e.g. "Monday, January 1, 2024, 03:04:05 PM UTC".
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y, %I:%M:%S %p UTC").to_string()
}

/// Events grouped by consecutive repository.
pub fn render_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "⚠️ No recent activity found.\n".to_string();
    }

    let mut out = String::new();
    let mut prev_repo: Option<&str> = None;

    for event in events {
        if prev_repo != Some(event.repo.name.as_str()) {
            prev_repo = Some(event.repo.name.as_str());
            let visibility = if event.public { "🌍 Public" } else { "🔒 Private" };
            let _ = writeln!(out, "\n📌 Repository: {}", event.repo.name);
            let _ = writeln!(out, "🔎 Visibility: {}", visibility);
            let _ = writeln!(out, "📌 Events in this repository: \n");
        }

        let _ = writeln!(out, "🔹 Event: {}", event.event_type);
        let _ = writeln!(out, "📅 Date: {}", format_date(&event.created_at));
        match &event.payload.commits {
            Some(commits) => {
                let _ = writeln!(out, "📑 Total commits: {}\n", commits.len());
            }
            None => {
                let _ = writeln!(out, "📂 No commits in this event.\n");
            }
        }
    }

    out
}

pub fn render_starred(repos: &[Repository]) -> String {
    if repos.is_empty() {
        return "No repositories starred\n".to_string();
    }

    let mut out = String::new();
    for repo in repos {
        let _ = writeln!(out, "⭐ Starred {}", repo.name);
        let _ = writeln!(out, "🔗 Access it at - {}", repo.owner.html_url);
        if repo.topics.is_empty() {
            let _ = writeln!(out, "No topics\n");
        } else {
            let _ = writeln!(out, "Topics are - ");
            for topic in repo.topics.iter().take(TOPIC_LIMIT) {
                let _ = writeln!(out, "  {}", topic);
            }
            out.push('\n');
        }
    }
    out
}

pub fn render_profile(user: &User) -> String {
    format!(
        "🆔 Name: {}\n💼 Bio: {}\n👥 Followers: {} | Following: {}\n📌 Public Repos: {}\n🏠 Location: {}\n🔗 Profile: {}\n",
        user.name.as_deref().unwrap_or("N/A"),
        user.bio.as_deref().unwrap_or("No bio available"),
        user.followers,
        user.following,
        user.public_repos,
        user.location.as_deref().unwrap_or("Unknown"),
        user.html_url,
    )
}

/// Shared by pull requests and issues; `empty` is printed for no items.
pub fn render_issues(label: &str, issues: &[Issue], empty: &str) -> String {
    if issues.is_empty() {
        return format!("✅ {}\n", empty);
    }

    let mut out = String::new();
    for issue in issues.iter().take(LIST_LIMIT) {
        let _ = writeln!(out, "\n🔹 {}: {}", label, issue.title);
        let _ = writeln!(out, "🔗 {}", issue.html_url);
        let _ = writeln!(out, "📅 Created: {}", format_date(&issue.created_at));
    }
    out
}

pub fn render_commits(commits: &[Commit]) -> String {
    if commits.is_empty() {
        return "✅ No commits found.\n".to_string();
    }

    let mut out = String::new();
    for commit in commits.iter().take(LIST_LIMIT) {
        let short_sha: String = commit.sha.chars().take(7).collect();
        let summary = commit.commit.message.lines().next().unwrap_or_default();
        let _ = writeln!(out, "\n🔹 {} {}", short_sha, summary);
        if let Some(author) = &commit.commit.author {
            let _ = writeln!(out, "👤 {}", author.name);
            let _ = writeln!(out, "📅 {}", format_date(&author.date));
        }
        let _ = writeln!(out, "🔗 {}", commit.html_url);
    }
    out
}

pub fn render_repos(repos: &[Repository]) -> String {
    if repos.is_empty() {
        return "No public repositories\n".to_string();
    }

    let mut out = String::new();
    for repo in repos {
        let _ = writeln!(out, "\n📦 {}", repo.name);
        if let Some(description) = &repo.description {
            let _ = writeln!(out, "📝 {}", description);
        }
        let _ = writeln!(
            out,
            "⭐ {} | 🛠 {}",
            repo.stargazers_count,
            repo.language.as_deref().unwrap_or("Unknown")
        );
        if let Some(updated_at) = &repo.updated_at {
            let _ = writeln!(out, "📅 Updated: {}", format_date(updated_at));
        }
    }
    out
}

fn render_window(out: &mut String, name: &str, window: &RateLimitWindow) {
    let reset = DateTime::<Utc>::from_timestamp(window.reset, 0)
        .map(|dt| format_date(&dt))
        .unwrap_or_else(|| "unknown".to_string());
    let _ = writeln!(
        out,
        "{}: {}/{} remaining ({} used), resets {}",
        name, window.remaining, window.limit, window.used, reset
    );
}

pub fn render_rate_limit(status: &RateLimitStatus) -> String {
    let mut out = String::new();
    render_window(&mut out, "⏱ Core", &status.resources.core);
    if let Some(search) = &status.resources.search {
        render_window(&mut out, "🔎 Search", search);
    }
    out
}

pub const HELP: &str = "
Usage: gh-activity [options] <command> <subject> [page]

GitHub CLI tool for fetching user activity, profile details, starred repositories,
pull requests, issues and commits. Responses are cached locally.

Commands:
  help                       Show help information.
  event <username>           Recent activity of a GitHub user.
  checkStarred <username>    Starred repositories of a GitHub user.
  profile <username>         Profile details of a GitHub user.
  pulls <username>           Pull requests created in the last 30 days.
  issues <owner/repo>        Open issues for a repository.
  commits <owner/repo>       Recent commits for a repository.
  repos <username>           Public repositories of a GitHub user.
  checklimit                 Current API rate limit status (never cached).
  endSession                 Delete the local response cache.

Options:
  -c, --clear                Clear the console first.
  -d, --debug                Print debug info.

Example:
  gh-activity event octocat
  gh-activity issues rust-lang/rust 2
";
