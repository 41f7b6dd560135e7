use super::extractor::{self, CardEntry, FailureLink};
use super::{LogLevel, Stage, StatusRecord};
use crate::Result;
use crate::facts::log_parser::{log_token, normalize_apostrophes, parse_log};
use crate::facts::packages::PackageRecord;
use crate::facts::{Channel, PageFetcher, Progress, ReportUrls};
use ohno::{EnrichableExt, IntoAppError, app_err};
use std::collections::{BTreeMap, HashMap};
use url::Url;

const LOG_TARGET: &str = "    status";

/// Scrapes build statuses from the Bioconductor build reports.
#[derive(Debug, Clone)]
pub struct Provider {
    fetcher: PageFetcher,
    urls: ReportUrls,
}

impl Provider {
    #[must_use]
    pub const fn new(fetcher: PageFetcher, urls: ReportUrls) -> Self {
        Self { fetcher, urls }
    }

    /// One record per package and channel, channel by channel in the given order.
    ///
    /// Fails if a long report, a package report page or a build log cannot be fetched, or
    /// if a report does not have the expected structure.
    pub async fn get_statuses(&self, packages: &[PackageRecord], channels: &[Channel], progress: &dyn Progress) -> Result<Vec<StatusRecord>> {
        let mut by_report: BTreeMap<&'static str, Vec<&PackageRecord>> = BTreeMap::new();
        for package in packages {
            if let Some(report) = package.package_type.report() {
                by_report.entry(report).or_default().push(package);
            }
        }

        let mut records = Vec::with_capacity(packages.len() * channels.len());
        for &channel in channels {
            progress.set_phase(&format!("Build status ({channel})"), packages.len() as u64);

            let mut channel_records: HashMap<String, StatusRecord> = HashMap::with_capacity(packages.len());
            for (report, members) in &by_report {
                for record in self.get_report_statuses(channel, report, members, progress).await? {
                    let _ = channel_records.insert(record.name.clone(), record);
                }
            }

            // Requested order. Packages without a build report are not found.
            for package in packages {
                let record = match channel_records.remove(&package.name) {
                    Some(record) => record,
                    None => {
                        progress.advance(&package.name);
                        StatusRecord::not_found(package.name.clone(), package.package_type, channel)
                    }
                };
                records.push(record);
            }
        }

        Ok(records)
    }

    async fn get_report_statuses(
        &self,
        channel: Channel,
        report: &str,
        packages: &[&PackageRecord],
        progress: &dyn Progress,
    ) -> Result<Vec<StatusRecord>> {
        let report_url = self.urls.long_report(channel, report)?;
        let page = self
            .fetcher
            .fetch(&report_url)
            .await
            .map_err(|e| e.enrich_with(|| format!("fetching the {channel} {report} build report")))?;

        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        let mut cards = extractor::scan_long_report(&page, &names);
        drop(page);

        let mut records = Vec::with_capacity(packages.len());
        for package in packages {
            let record = match cards.remove(&package.name) {
                None => {
                    log::info!(target: LOG_TARGET, "'{}' is not in the {channel} {report} report", package.name);
                    StatusRecord::not_found(package.name.clone(), package.package_type, channel)
                }
                Some(card) => self.build_record(channel, report, package, card, &report_url).await?,
            };

            log::debug!(target: LOG_TARGET, "{} ({channel}): {}", package.name, record.log_level);
            progress.advance(&package.name);
            records.push(record);
        }

        Ok(records)
    }

    async fn build_record(&self, channel: Channel, report: &str, package: &PackageRecord, card: CardEntry, report_url: &Url) -> Result<StatusRecord> {
        let mut record = StatusRecord {
            version: card.version,
            maintainer: card.maintainer,
            log_level: card.log_level,
            ..StatusRecord::not_found(package.name.clone(), package.package_type, channel)
        };

        if !card.log_level.is_failure() {
            return Ok(record);
        }

        let (failure, page_url) = match card.failure {
            Some(failure) => (failure, report_url.clone()),
            None => self.find_failure_on_package_page(channel, report, &package.name, card.log_level).await?,
        };

        match failure.href {
            None => {
                record.stage = Some(Stage::PreBuild);
                record.messages = vec![extractor::prebuild_message(&failure.text)];
            }
            Some(href) => {
                let stage = Stage::from_log_link(&href).into_app_err_with(|| {
                    format!("unrecognized build stage in log link '{href}' for package '{}' ({channel})", package.name)
                })?;

                let log_url = page_url
                    .join(&href)
                    .into_app_err_with(|| format!("invalid log link '{href}' for package '{}' ({channel})", package.name))?;

                record.stage = Some(stage);
                record.messages = self.fetch_log_messages(&log_url, card.log_level, &package.name, channel).await?;
            }
        }

        Ok(record)
    }

    /// Look for the failing status on the package's own report page.
    async fn find_failure_on_package_page(&self, channel: Channel, report: &str, package: &str, level: LogLevel) -> Result<(FailureLink, Url)> {
        let page_url = self.urls.package_report(channel, report, package, "")?;
        let page = self
            .fetcher
            .fetch(&page_url)
            .await
            .map_err(|e| e.enrich_with(|| format!("fetching the {channel} report page of package '{package}'")))?;

        let failure = extractor::find_failure_link(&page, level)
            .ok_or_else(|| app_err!("could not find the {level} status of package '{package}' in the {channel} build report"))?;

        Ok((failure, page_url))
    }

    async fn fetch_log_messages(&self, log_url: &Url, level: LogLevel, package: &str, channel: Channel) -> Result<Vec<String>> {
        let page = self
            .fetcher
            .fetch(log_url)
            .await
            .map_err(|e| e.enrich_with(|| format!("fetching the {channel} build log of package '{package}'")))?;

        let log = extractor::extract_log(&page)
            .ok_or_else(|| app_err!("could not find the build log at {log_url} for package '{package}' ({channel})"))?;

        let severity = level.report_class().unwrap_or_default();
        let mut messages = parse_log(&normalize_apostrophes(&log), severity);
        if messages.is_empty() {
            log::warn!(target: LOG_TARGET, "No {} entries in the build log of '{package}' ({channel})", log_token(severity));
            messages.push(format!("{level} reported, but the build log at {log_url} contains no {} entries", log_token(severity)));
        }

        Ok(messages)
    }
}
