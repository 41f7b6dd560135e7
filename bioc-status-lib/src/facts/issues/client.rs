//! Minimal GitHub REST client for listing open issues.

use crate::Result;
use crate::facts::RepoSpec;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;

const LOG_TARGET: &str = "    github";
const ISSUE_PAGE_SIZE: u8 = 100;
const MAX_ISSUE_PAGES: u32 = 10;

/// The fields of a GitHub issue the reports use.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,

    #[serde(default)]
    pub labels: Vec<Label>,

    pub assignee: Option<User>,

    #[serde(default)]
    pub assignees: Vec<User>,

    /// Present when the issue is actually a pull request.
    pub pull_request: Option<PullRequestMarker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestMarker {
    pub url: Option<String>,
}

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client with an optional token, against the given API root.
    pub fn new(token: Option<&str>, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("bioc-status/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open issues of a repository, pull requests excluded.
    ///
    /// Returns `None` when the repository does not exist.
    pub async fn open_issues(&self, repo: &RepoSpec) -> Result<Option<Vec<Issue>>> {
        let mut issues = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues?state=open&per_page={ISSUE_PAGE_SIZE}&page={page}",
                self.base_url,
                repo.owner(),
                repo.repo()
            );

            log::info!(target: LOG_TARGET, "Querying GitHub for open issues of '{repo}' (page {page})");
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .into_app_err_with(|| format!("querying open issues of '{repo}'"))?;

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) {
                bail!("GitHub refused the request for '{repo}' (HTTP {status}), the API rate limit may be exhausted");
            }

            if !status.is_success() {
                bail!("querying open issues of '{repo}' failed: HTTP {status}");
            }

            let has_next_page = resp
                .headers()
                .get(LINK)
                .and_then(|h| h.to_str().ok())
                .is_some_and(|link| link.contains(r#"rel="next""#));

            let batch: Vec<Issue> = resp
                .json()
                .await
                .into_app_err_with(|| format!("decoding open issues of '{repo}'"))?;

            if batch.is_empty() {
                break;
            }

            issues.extend(batch.into_iter().filter(|issue| issue.pull_request.is_none()));

            if !has_next_page {
                break;
            }

            page += 1;
            if page > MAX_ISSUE_PAGES {
                log::debug!(target: LOG_TARGET, "Stopping after {MAX_ISSUE_PAGES} pages of issues for '{repo}'");
                break;
            }
        }

        Ok(Some(issues))
    }
}
