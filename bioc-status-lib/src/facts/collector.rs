use super::downloads::DownloadStat;
use super::issues::{IssueLookup, IssueRecord};
use super::packages::PackageRecord;
use super::status::StatusRecord;
use super::{Cache, Channel, PageFetcher, Progress, ProviderResult, ReportUrls, Snapshot};
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

const LOG_TARGET: &str = " collector";

/// Where and how the collector fetches its data.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub base_url: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub ignore_cached: bool,
}

/// Gathers package data from every source, one request at a time.
pub struct Collector {
    packages_provider: super::packages::Provider,
    status_provider: super::status::Provider,
    downloads_provider: super::downloads::Provider,
    issues_provider: super::issues::Provider,
    progress: Arc<dyn Progress>,
    now: DateTime<Utc>,
}

impl core::fmt::Debug for Collector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collector")
            .field("packages_provider", &self.packages_provider)
            .field("status_provider", &self.status_provider)
            .field("downloads_provider", &self.downloads_provider)
            .field("issues_provider", &self.issues_provider)
            .field("progress", &"<dyn Progress>")
            .field("now", &self.now)
            .finish()
    }
}

impl Collector {
    pub fn new(settings: &CollectorSettings, now: DateTime<Utc>, progress: impl Progress + 'static) -> Result<Self> {
        let cache = Cache::new(&settings.cache_dir, settings.cache_ttl, now, settings.ignore_cached);
        let fetcher = PageFetcher::new(settings.request_timeout, cache)?;
        let urls = ReportUrls::new(&settings.base_url)?;

        Ok(Self {
            packages_provider: super::packages::Provider::new(fetcher.clone(), urls.clone()),
            status_provider: super::status::Provider::new(fetcher.clone(), urls.clone()),
            downloads_provider: super::downloads::Provider::new(fetcher.clone(), urls.clone()),
            issues_provider: super::issues::Provider::new(
                fetcher,
                urls,
                settings.github_token.as_deref(),
                &settings.github_api_url,
                settings.request_timeout,
            )?,
            progress: Arc::new(progress),
            now,
        })
    }

    /// The reference time of this run.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub async fn list_packages(&self, channel: Channel) -> Result<Vec<PackageRecord>> {
        let result = self.packages_provider.get_packages(channel, self.progress.as_ref()).await;
        self.progress.done();
        result
    }

    /// Tag package names with their category, using the manifests of `channel`.
    pub async fn resolve_packages(&self, channel: Channel, names: &[String]) -> Result<Vec<PackageRecord>> {
        let result = self.packages_provider.resolve(channel, names, self.progress.as_ref()).await;
        self.progress.done();
        result
    }

    pub async fn statuses(&self, packages: &[PackageRecord], channels: &[Channel]) -> Result<Vec<StatusRecord>> {
        let result = self.status_provider.get_statuses(packages, channels, self.progress.as_ref()).await;
        self.progress.done();
        result
    }

    pub async fn download_stats(&self, packages: &[PackageRecord]) -> Result<Vec<DownloadStat>> {
        let result = self
            .downloads_provider
            .get_download_stats(packages, self.now, self.progress.as_ref())
            .await;
        self.progress.done();
        result
    }

    pub async fn issues(&self, packages: &[PackageRecord], channel: Channel) -> Vec<(String, ProviderResult<Vec<IssueRecord>>)> {
        let result = self.issues_provider.get_issues(packages, channel, self.progress.as_ref()).await;
        self.progress.done();
        result
    }

    /// Collect a complete data set for the named packages.
    ///
    /// Package categories and issues come from the first channel.
    pub async fn collect_snapshot(&self, names: &[String], channels: &[Channel]) -> Result<Snapshot> {
        let primary = channels.first().copied().unwrap_or(Channel::Release);
        log::info!(target: LOG_TARGET, "Collecting data for {} package(s)", names.len());

        let packages = self.resolve_packages(primary, names).await?;
        let statuses = self.statuses(&packages, channels).await?;
        let downloads = self.download_stats(&packages).await?;
        let issues: BTreeMap<String, IssueLookup> = self
            .issues(&packages, primary)
            .await
            .into_iter()
            .map(|(name, result)| (name, IssueLookup::from(result)))
            .collect();

        Ok(Snapshot {
            taken_at: self.now,
            channels: channels.to_vec(),
            packages,
            statuses,
            downloads,
            issues,
        })
    }
}
