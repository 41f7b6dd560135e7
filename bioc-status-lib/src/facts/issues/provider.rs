use super::client::Client;
use super::{IssueRecord, description};
use crate::Result;
use crate::facts::cache::{Cache, CacheResult};
use crate::facts::packages::PackageRecord;
use crate::facts::path_utils::sanitize_path_component;
use crate::facts::{Channel, PageFetcher, Progress, ProviderResult, ReportUrls, RepoSpec};
use core::time::Duration;
use ohno::EnrichableExt;
use std::sync::Arc;
use url::Url;

const LOG_TARGET: &str = "    issues";

/// Bug tracker hosts whose issues can be listed.
const SUPPORTED_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Where a package's issues live.
#[derive(Debug)]
enum Tracker {
    GitHub(RepoSpec),

    /// The issues cannot be looked up for this package.
    Unknown(String),

    /// The description page could not be fetched this time.
    Unavailable(String),
}

/// Looks up the open issues of packages whose bug tracker is on GitHub.
#[derive(Debug, Clone)]
pub struct Provider {
    fetcher: PageFetcher,
    urls: ReportUrls,
    client: Client,
    cache: Cache,
}

impl Provider {
    pub fn new(fetcher: PageFetcher, urls: ReportUrls, github_token: Option<&str>, github_api_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            cache: fetcher.cache().clone(),
            client: Client::new(github_token, github_api_url, timeout)?,
            fetcher,
            urls,
        })
    }

    /// The issue lookup of every package, in the given order.
    pub async fn get_issues(
        &self,
        packages: &[PackageRecord],
        channel: Channel,
        progress: &dyn Progress,
    ) -> Vec<(String, ProviderResult<Vec<IssueRecord>>)> {
        progress.set_phase("Open issues", packages.len() as u64);

        let mut results = Vec::with_capacity(packages.len());
        for package in packages {
            let result = self.get_package_issues(package, channel).await;
            match &result {
                ProviderResult::Found(issues) => {
                    log::debug!(target: LOG_TARGET, "{} open issue(s) for '{}'", issues.len(), package.name);
                }
                ProviderResult::Unknown(reason) => {
                    log::warn!(target: LOG_TARGET, "Issues of '{}' are unknown: {reason}", package.name);
                }
                ProviderResult::Error(e) => {
                    log::error!(target: LOG_TARGET, "Could not look up the issues of '{}': {e:#}", package.name);
                }
            }

            progress.advance(&package.name);
            results.push((package.name.clone(), result));
        }

        results
    }

    async fn get_package_issues(&self, package: &PackageRecord, channel: Channel) -> ProviderResult<Vec<IssueRecord>> {
        let filename = format!("issues/{}.json", sanitize_path_component(&package.name));
        match self.cache.load::<Vec<IssueRecord>>(&filename) {
            CacheResult::Data(issues) => return ProviderResult::Found(issues),
            CacheResult::NoData(reason) => return ProviderResult::Unknown(reason),
            CacheResult::Miss => {}
        }

        let repo = match self.find_repository(package, channel).await {
            Ok(Tracker::GitHub(repo)) => repo,
            Ok(Tracker::Unknown(reason)) => {
                self.remember_unknown(&filename, &reason);
                return ProviderResult::Unknown(reason);
            }
            Ok(Tracker::Unavailable(reason)) => return ProviderResult::Unknown(reason),
            Err(e) => return ProviderResult::Error(Arc::new(e)),
        };

        match self.client.open_issues(&repo).await {
            Ok(Some(issues)) => {
                let records: Vec<IssueRecord> = issues
                    .into_iter()
                    .map(|issue| IssueRecord::from_issue(&package.name, issue))
                    .collect();

                if let Err(e) = self.cache.save(&filename, &records) {
                    log::debug!(target: LOG_TARGET, "Could not cache the issues of '{}': {e:#}", package.name);
                }

                ProviderResult::Found(records)
            }
            Ok(None) => {
                let reason = format!("repository '{repo}' not found");
                self.remember_unknown(&filename, &reason);
                ProviderResult::Unknown(reason)
            }
            Err(e) => ProviderResult::Error(Arc::new(e.enrich_with(|| format!("listing the open issues of '{}'", package.name)))),
        }
    }

    /// Resolve the package's GitHub repository from its description page.
    async fn find_repository(&self, package: &PackageRecord, channel: Channel) -> Result<Tracker> {
        let url = self.urls.description(channel, package.package_type, &package.name)?;

        let page = match self.fetcher.fetch_optional(&url).await {
            Ok(Some(page)) => page,
            Ok(None) => return Ok(Tracker::Unknown("the package description page does not exist".to_string())),
            Err(e) => return Ok(Tracker::Unavailable(format!("the package description page is unavailable: {e:#}"))),
        };

        let Some(link) = description::find_bug_reports(&page) else {
            return Ok(Tracker::Unknown("the package does not list a BugReports link".to_string()));
        };

        let Ok(tracker) = Url::parse(&link) else {
            return Ok(Tracker::Unknown(format!("invalid BugReports link '{link}'")));
        };

        let host = tracker.host_str().unwrap_or_default();
        if !SUPPORTED_HOSTS.contains(&host) {
            return Ok(Tracker::Unknown(format!("unsupported issue tracker host '{host}'")));
        }

        Ok(RepoSpec::parse(&tracker).map_or_else(|e| Tracker::Unknown(format!("{e:#}")), Tracker::GitHub))
    }

    fn remember_unknown(&self, filename: &str, reason: &str) {
        if let Err(e) = self.cache.save_no_data(filename, reason) {
            log::debug!(target: LOG_TARGET, "Could not cache {filename}: {e:#}");
        }
    }
}
