// GitHub API endpoint descriptors.
// Maps each logical request to a REST path and its query parameters.

use std::fmt;

use chrono::NaiveDate;

use super::types::RepoName;

/// Default page size requested from list endpoints.
pub const PER_PAGE: u32 = 30;

/// A remote request, independent of paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    UserEvents { username: String },
    UserStarred { username: String },
    UserProfile { username: String },
    /// Pull requests authored by `username` created after `since`.
    SearchPullRequests { username: String, since: NaiveDate },
    RepoIssues { repo: RepoName },
    RepoCommits { repo: RepoName },
    RateLimit,
    UserRepos { username: String },
}

impl Endpoint {
    /// REST path relative to the API base.
    pub fn path(&self) -> String {
        match self {
            Endpoint::UserEvents { username } => format!("/users/{}/events", username),
            Endpoint::UserStarred { username } => format!("/users/{}/starred", username),
            Endpoint::UserProfile { username } => format!("/users/{}", username),
            Endpoint::SearchPullRequests { .. } => "/search/issues".to_string(),
            Endpoint::RepoIssues { repo } => {
                format!("/repos/{}/{}/issues", repo.owner, repo.repo)
            }
            Endpoint::RepoCommits { repo } => {
                format!("/repos/{}/{}/commits", repo.owner, repo.repo)
            }
            Endpoint::RateLimit => "/rate_limit".to_string(),
            Endpoint::UserRepos { username } => format!("/users/{}/repos", username),
        }
    }

    /// Whether the endpoint accepts `page`/`per_page`.
    pub fn is_paginated(&self) -> bool {
        !matches!(self, Endpoint::UserProfile { .. } | Endpoint::RateLimit)
    }

    /// Query parameters for the given page.
    pub fn query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        match self {
            Endpoint::SearchPullRequests { username, since } => {
                params.push((
                    "q",
                    format!(
                        "author:{} type:pr created:>{}",
                        username,
                        since.format("%Y-%m-%d")
                    ),
                ));
            }
            Endpoint::UserRepos { .. } => {
                params.push(("sort", "updated".to_string()));
                params.push(("direction", "desc".to_string()));
            }
            _ => {}
        }

        if self.is_paginated() {
            params.push(("page", page.max(1).to_string()));
            params.push(("per_page", PER_PAGE.to_string()));
        }

        params
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let repo: RepoName = "octocat/hello".parse().unwrap();
        let username = "octocat".to_string();

        assert_eq!(
            Endpoint::UserEvents { username: username.clone() }.path(),
            "/users/octocat/events"
        );
        assert_eq!(
            Endpoint::UserProfile { username: username.clone() }.path(),
            "/users/octocat"
        );
        assert_eq!(
            Endpoint::RepoCommits { repo: repo.clone() }.path(),
            "/repos/octocat/hello/commits"
        );
        assert_eq!(Endpoint::RepoIssues { repo }.path(), "/repos/octocat/hello/issues");
        assert_eq!(Endpoint::RateLimit.path(), "/rate_limit");
    }

    #[test]
    fn test_search_query() {
        let since = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let endpoint = Endpoint::SearchPullRequests {
            username: "octocat".to_string(),
            since,
        };

        let query = endpoint.query(2);
        assert_eq!(query[0], ("q", "author:octocat type:pr created:>2024-03-01".to_string()));
        assert!(query.contains(&("page", "2".to_string())));
    }

    #[test]
    fn test_unpaginated_has_no_page() {
        let profile = Endpoint::UserProfile {
            username: "octocat".to_string(),
        };
        assert!(profile.query(3).is_empty());
        assert!(Endpoint::RateLimit.query(1).is_empty());
    }

    #[test]
    fn test_page_zero_becomes_one() {
        let endpoint = Endpoint::UserStarred {
            username: "octocat".to_string(),
        };
        assert!(endpoint.query(0).contains(&("page", "1".to_string())));
    }
}
